//! In-memory point-of-sale store.
//!
//! Holds one tenant-partitioned table per record kind and serves the
//! analytics [`QuerySource`] contract from them.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use tillbook_analytics::{QueryError, QuerySource, TimeWindow};
use tillbook_core::{
    CategoryId, DomainError, Entity, InventoryItemId, InvoiceId, ProductId, TenantId,
};
use tillbook_inventory::InventoryItem;
use tillbook_invoicing::{Invoice, InvoiceDraft, issue_invoice};
use tillbook_products::{Category, Product};

use crate::config::AppConfig;
use crate::read_model::{InMemoryTenantStore, StoreError, TenantStore};

/// Inventory registration request; the threshold falls back to configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryRow {
    pub name: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

#[derive(Debug)]
pub struct InMemoryPosStore {
    invoices: InMemoryTenantStore<InvoiceId, Invoice>,
    products: InMemoryTenantStore<ProductId, Product>,
    categories: InMemoryTenantStore<CategoryId, Category>,
    inventory: InMemoryTenantStore<InventoryItemId, InventoryItem>,
    low_stock_threshold: i64,
}

impl Default for InMemoryPosStore {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

fn put<V>(table: &InMemoryTenantStore<V::Id, V>, value: V) -> Result<(), StoreError>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync + 'static,
{
    table.upsert(value.tenant_id(), value.id().clone(), value)
}

impl InMemoryPosStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            invoices: InMemoryTenantStore::new(),
            products: InMemoryTenantStore::new(),
            categories: InMemoryTenantStore::new(),
            inventory: InMemoryTenantStore::new(),
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    pub fn put_category(&self, category: Category) -> Result<(), StoreError> {
        put(&self.categories, category)
    }

    pub fn put_product(&self, product: Product) -> Result<(), StoreError> {
        put(&self.products, product)
    }

    pub fn put_inventory(&self, item: InventoryItem) -> Result<(), StoreError> {
        put(&self.inventory, item)
    }

    /// Store an already-issued invoice as-is (imports, seeds).
    ///
    /// Totals are trusted, but a line with no quantity is not a sale.
    pub fn put_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        if let Some(line) = invoice.line_items.iter().find(|l| l.quantity == 0) {
            return Err(DomainError::validation(format!(
                "invoice {} has a zero-quantity line for product {}",
                invoice.id, line.product_id
            ))
            .into());
        }
        put(&self.invoices, invoice)
    }

    pub fn register_inventory(
        &self,
        tenant_id: TenantId,
        row: NewInventoryRow,
    ) -> Result<InventoryItem, StoreError> {
        let mut item =
            InventoryItem::new(InventoryItemId::new(), tenant_id, row.name, row.quantity, row.price)?
                .with_threshold(row.low_stock_threshold.unwrap_or(self.low_stock_threshold));
        item.category = row.category;
        item.supplier = row.supplier;
        put(&self.inventory, item.clone())?;
        Ok(item)
    }

    /// Issue an invoice against this tenant's catalog and store it.
    pub fn issue_invoice(&self, draft: &InvoiceDraft) -> Result<Invoice, StoreError> {
        let mut catalog = HashMap::with_capacity(draft.lines.len());
        for line in &draft.lines {
            if let Some(product) = self.products.get(draft.tenant_id, &line.product_id)? {
                catalog.insert(line.product_id, product);
            }
        }
        let invoice = issue_invoice(draft, |id| catalog.get(&id).cloned())?;
        if !self.invoices.insert_if_absent(invoice.tenant_id, invoice.id, invoice.clone())? {
            return Err(DomainError::invariant(format!("invoice {} already exists", invoice.id)).into());
        }
        tracing::info!(tenant_id = %invoice.tenant_id, invoice_id = %invoice.id, "invoice stored");
        Ok(invoice)
    }

    pub fn mark_invoice_paid(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, StoreError> {
        let mut invoice = self
            .invoices
            .get(tenant_id, &invoice_id)?
            .ok_or_else(|| DomainError::not_found(format!("invoice {invoice_id}")))?;
        invoice.mark_paid();
        put(&self.invoices, invoice.clone())?;
        Ok(invoice)
    }
}

fn upstream(err: StoreError) -> QueryError {
    tracing::error!(error = %err, "in-memory store query failed");
    QueryError::new(err.to_string())
}

impl QuerySource for InMemoryPosStore {
    fn find_invoices(
        &self,
        tenant_id: TenantId,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<Invoice>, QueryError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .list(tenant_id)
            .map_err(upstream)?
            .into_iter()
            .filter(|i| window.is_none_or(|w| w.contains(i.created_at)))
            .collect();
        invoices.sort_by_key(|i| (i.created_at, i.id));
        Ok(invoices)
    }

    fn find_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Product>, QueryError> {
        self.products.get(tenant_id, &product_id).map_err(upstream)
    }

    fn find_category(
        &self,
        tenant_id: TenantId,
        category_id: CategoryId,
    ) -> Result<Option<Category>, QueryError> {
        self.categories.get(tenant_id, &category_id).map_err(upstream)
    }

    fn find_inventory(&self, tenant_id: TenantId) -> Result<Vec<InventoryItem>, QueryError> {
        let mut rows = self.inventory.list(tenant_id).map_err(upstream)?;
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use tillbook_invoicing::{DraftLine, PaymentMethod, PaymentStatus};

    fn catalog(store: &InMemoryPosStore, tenant_id: TenantId) -> Product {
        let category = Category::new(CategoryId::new(), tenant_id, "Drinks").unwrap();
        let product = Product::new(
            ProductId::new(),
            tenant_id,
            "Lassi",
            category.id,
            Decimal::new(6000, 2),
        )
        .unwrap();
        store.put_category(category).unwrap();
        store.put_product(product.clone()).unwrap();
        product
    }

    fn draft(tenant_id: TenantId, product: &Product, minutes_ago: i64) -> InvoiceDraft {
        InvoiceDraft {
            tenant_id,
            invoice_id: InvoiceId::new(),
            customer_name: "Meera".to_string(),
            lines: vec![DraftLine { product_id: product.id, quantity: 2 }],
            payment_method: PaymentMethod::Online,
            cash_received: Decimal::ZERO,
            gst_percentage: Decimal::new(5, 0),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
                - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn issued_invoices_are_listed_in_creation_order() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);

        let later = store.issue_invoice(&draft(tenant, &lassi, 0)).unwrap();
        let earlier = store.issue_invoice(&draft(tenant, &lassi, 30)).unwrap();

        let listed: Vec<InvoiceId> = store
            .find_invoices(tenant, None)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(listed, vec![earlier.id, later.id]);
        assert_eq!(later.total_amount, Decimal::new(12600, 2));
    }

    #[test]
    fn invoices_are_tenant_scoped() {
        let store = InMemoryPosStore::default();
        let a = TenantId::new();
        let b = TenantId::new();
        let lassi = catalog(&store, a);
        store.issue_invoice(&draft(a, &lassi, 0)).unwrap();

        assert!(store.find_invoices(b, None).unwrap().is_empty());
        assert_eq!(store.find_product(b, lassi.id).unwrap(), None);
    }

    #[test]
    fn issuing_against_foreign_catalog_fails() {
        let store = InMemoryPosStore::default();
        let a = TenantId::new();
        let lassi = catalog(&store, a);

        let err = store.issue_invoice(&draft(TenantId::new(), &lassi, 0)).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound(_))));
    }

    #[test]
    fn window_filter_applies() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        let inv = store.issue_invoice(&draft(tenant, &lassi, 0)).unwrap();

        let hit = TimeWindow::closed(inv.created_at, inv.created_at);
        let miss = TimeWindow::half_open(inv.created_at - Duration::hours(1), inv.created_at);
        assert_eq!(store.find_invoices(tenant, Some(&hit)).unwrap().len(), 1);
        assert!(store.find_invoices(tenant, Some(&miss)).unwrap().is_empty());
    }

    #[test]
    fn mark_paid_requires_owned_invoice() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        let inv = store.issue_invoice(&draft(tenant, &lassi, 0)).unwrap();

        let err = store.mark_invoice_paid(TenantId::new(), inv.id).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound(_))));

        let paid = store.mark_invoice_paid(tenant, inv.id).unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        let stored = store.find_invoices(tenant, None).unwrap();
        assert!(stored[0].is_paid());
    }

    #[test]
    fn duplicate_invoice_id_is_rejected() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        let d = draft(tenant, &lassi, 0);
        store.issue_invoice(&d).unwrap();

        let err = store.issue_invoice(&d).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn poisoned_catalog_surfaces_instead_of_not_found() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        store.products.poison();

        let err = store.issue_invoice(&draft(tenant, &lassi, 0)).unwrap_err();
        assert_eq!(err, StoreError::Poisoned);
        assert!(store.find_invoices(tenant, None).unwrap().is_empty());
    }

    #[test]
    fn concurrent_issues_of_one_draft_store_it_once() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        let d = draft(tenant, &lassi, 0);

        let stored = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| store.issue_invoice(&d))).collect();
            handles.into_iter().map(|h| h.join().is_ok_and(|r| r.is_ok())).filter(|ok| *ok).count()
        });

        assert_eq!(stored, 1);
        assert_eq!(store.find_invoices(tenant, None).unwrap().len(), 1);
    }

    #[test]
    fn zero_quantity_lines_are_refused_on_import() {
        let store = InMemoryPosStore::default();
        let tenant = TenantId::new();
        let lassi = catalog(&store, tenant);
        let mut invoice = store.issue_invoice(&draft(tenant, &lassi, 0)).unwrap();
        invoice.id = InvoiceId::new();
        invoice.line_items[0].quantity = 0;

        let err = store.put_invoice(invoice).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert_eq!(store.find_invoices(tenant, None).unwrap().len(), 1);
    }

    #[test]
    fn registered_inventory_uses_configured_threshold() {
        let config = AppConfig { low_stock_threshold: 20, ..AppConfig::default() };
        let store = InMemoryPosStore::new(&config);
        let tenant = TenantId::new();

        let row = NewInventoryRow {
            name: "Paneer".to_string(),
            category: None,
            quantity: 15,
            price: Decimal::new(250, 0),
            supplier: None,
            low_stock_threshold: None,
        };
        let item = store.register_inventory(tenant, row.clone()).unwrap();
        assert_eq!(item.low_stock_threshold, 20);
        assert!(item.is_low_stock());

        let explicit = store
            .register_inventory(tenant, NewInventoryRow { low_stock_threshold: Some(3), ..row })
            .unwrap();
        assert_eq!(explicit.low_stock_threshold, 3);
        assert_eq!(store.find_inventory(tenant).unwrap().len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        #[test]
        fn listing_is_sorted_by_creation_time(offsets in prop::collection::vec(0i64..10_000, 1..30)) {
            let store = InMemoryPosStore::default();
            let tenant = TenantId::new();
            let lassi = catalog(&store, tenant);
            for minutes in &offsets {
                store.issue_invoice(&draft(tenant, &lassi, *minutes)).unwrap();
            }

            let listed = store.find_invoices(tenant, None).unwrap();
            prop_assert_eq!(listed.len(), offsets.len());
            prop_assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }
    }
}
