//! Entity trait: identity + the tenant that owns it.

use crate::id::TenantId;

/// Entity marker + minimal interface.
///
/// Every record in a point-of-sale account belongs to exactly one tenant
/// (vendor). Stores use `tenant_id()` to partition records.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the owning tenant.
    fn tenant_id(&self) -> TenantId;
}
