//! Read-only query interface the engine consumes.

use std::sync::Arc;

use tillbook_core::{CategoryId, ProductId, TenantId};
use tillbook_inventory::InventoryItem;
use tillbook_invoicing::Invoice;
use tillbook_products::{Category, Product};

use crate::error::QueryError;
use crate::window::TimeWindow;

/// Tenant-scoped view over invoices and reference data.
///
/// Implementations must only return records owned by `tenant_id`.
/// `find_invoices` returns invoices ordered by `created_at` (then id).
pub trait QuerySource: Send + Sync {
    /// Invoices owned by the tenant, optionally restricted to a window.
    fn find_invoices(
        &self,
        tenant_id: TenantId,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<Invoice>, QueryError>;

    fn find_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Product>, QueryError>;

    fn find_category(
        &self,
        tenant_id: TenantId,
        category_id: CategoryId,
    ) -> Result<Option<Category>, QueryError>;

    fn find_inventory(&self, tenant_id: TenantId) -> Result<Vec<InventoryItem>, QueryError>;
}

impl<S> QuerySource for Arc<S>
where
    S: QuerySource + ?Sized,
{
    fn find_invoices(
        &self,
        tenant_id: TenantId,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<Invoice>, QueryError> {
        (**self).find_invoices(tenant_id, window)
    }

    fn find_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Product>, QueryError> {
        (**self).find_product(tenant_id, product_id)
    }

    fn find_category(
        &self,
        tenant_id: TenantId,
        category_id: CategoryId,
    ) -> Result<Option<Category>, QueryError> {
        (**self).find_category(tenant_id, category_id)
    }

    fn find_inventory(&self, tenant_id: TenantId) -> Result<Vec<InventoryItem>, QueryError> {
        (**self).find_inventory(tenant_id)
    }
}
