//! Which tenant an inventory report reads.

use serde::{Deserialize, Serialize};

use tillbook_core::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Admin,
}

/// Caller identity as established by the (external) auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub tenant_id: TenantId,
    pub role: Role,
}

impl Requester {
    pub fn vendor(tenant_id: TenantId) -> Self {
        Self { tenant_id, role: Role::Vendor }
    }

    pub fn admin(tenant_id: TenantId) -> Self {
        Self { tenant_id, role: Role::Admin }
    }
}

/// Resolved owner for an inventory summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryScope {
    owner: TenantId,
}

impl InventoryScope {
    /// Vendors always read their own rows; admins may name a target owner.
    pub fn for_requester(requester: &Requester, target: Option<TenantId>) -> Self {
        let owner = match requester.role {
            Role::Vendor => requester.tenant_id,
            Role::Admin => target.unwrap_or(requester.tenant_id),
        };
        Self { owner }
    }

    pub fn owner(&self) -> TenantId {
        self.owner
    }
}
