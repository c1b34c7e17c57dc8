use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tillbook_core::{CategoryId, DomainError, DomainResult, Entity, ProductId, TenantId};

/// Catalog product (live record; invoices keep their own snapshot of name/price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub name: String,
    pub category: CategoryId,
    /// Current unit price.
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i64,
}

impl Product {
    pub fn new(
        id: ProductId,
        tenant_id: TenantId,
        name: impl Into<String>,
        category: CategoryId,
        price: Decimal,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if price.is_sign_negative() {
            return Err(DomainError::validation("price cannot be negative"));
        }
        Ok(Self {
            id,
            tenant_id,
            name,
            category,
            price,
            stock_quantity: 0,
        })
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
