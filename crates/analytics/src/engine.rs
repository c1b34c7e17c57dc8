//! Aggregation engine: fetch a tenant's records once, reduce in memory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use tillbook_core::{CategoryId, ProductId, TenantId};
use tillbook_invoicing::Invoice;
use tillbook_products::{Category, Product};

use crate::aggregate;
use crate::error::AnalyticsResult;
use crate::reports::{
    BestSeller, GrowthComparison, InventorySummary, MonthlySales, PeriodicSeries, SalesSummary,
};
use crate::scope::InventoryScope;
use crate::source::QuerySource;
use crate::window::{Granularity, RangeSelector, TimeWindow};

/// Computes reports for one tenant at a time against a [`QuerySource`].
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<S> {
    source: S,
}

impl<S> AnalyticsEngine<S>
where
    S: QuerySource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Revenue, transactions, top products, per-category totals and distinct
    /// customers for the selected window.
    pub fn sales_summary(
        &self,
        tenant_id: TenantId,
        range: &RangeSelector,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<SalesSummary> {
        let window = range.resolve(now)?;
        let invoices = self.invoices(tenant_id, Some(&window))?;
        let products = self.products_for(tenant_id, &invoices)?;
        let categories = self.categories_for(tenant_id, products.values())?;

        aggregate::summarize_sales(&invoices, &products, &categories)
    }

    pub fn inventory_summary(&self, scope: InventoryScope) -> AnalyticsResult<InventorySummary> {
        let owner = scope.owner();
        let mut items = self.source.find_inventory(owner)?;
        items.retain(|i| i.tenant_id == owner);
        tracing::debug!(tenant_id = %owner, rows = items.len(), "inventory summary");
        aggregate::summarize_inventory(&items)
    }

    /// Compares `[start, end]` against the preceding `[start - len, start)`.
    pub fn growth(
        &self,
        tenant_id: TenantId,
        range: &RangeSelector,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<GrowthComparison> {
        let window = range.resolve(now)?;
        let previous_window = window.preceding();

        let current = aggregate::sum_totals(&self.invoices(tenant_id, Some(&window))?)?;
        let previous = aggregate::sum_totals(&self.invoices(tenant_id, Some(&previous_window))?)?;

        aggregate::compare_growth(current, previous)
    }

    /// All-time top products by quantity, named from the live catalog.
    pub fn best_sellers(&self, tenant_id: TenantId) -> AnalyticsResult<Vec<BestSeller>> {
        let invoices = self.invoices(tenant_id, None)?;
        aggregate::rank_best_sellers(&invoices)
            .into_iter()
            .map(|(product_id, total_sold)| {
                let name = self.lookup_product(tenant_id, product_id)?.map(|p| p.name);
                Ok(BestSeller { product_id, name, total_sold })
            })
            .collect()
    }

    pub fn monthly_rollup(&self, tenant_id: TenantId) -> AnalyticsResult<Vec<MonthlySales>> {
        let invoices = self.invoices(tenant_id, None)?;
        aggregate::monthly_rollup(&invoices)
    }

    /// Time-bucketed series; without a range the tenant's full history is used.
    pub fn periodic_series(
        &self,
        tenant_id: TenantId,
        granularity: Granularity,
        range: Option<&RangeSelector>,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<PeriodicSeries> {
        let window = range.map(|r| r.resolve(now)).transpose()?;
        let invoices = self.invoices(tenant_id, window.as_ref())?;
        aggregate::periodic_series(&invoices, granularity)
    }

    fn invoices(
        &self,
        tenant_id: TenantId,
        window: Option<&TimeWindow>,
    ) -> AnalyticsResult<Vec<Invoice>> {
        let mut invoices = self.source.find_invoices(tenant_id, window)?;
        let fetched = invoices.len();
        invoices.retain(|i| i.tenant_id == tenant_id && window.is_none_or(|w| w.contains(i.created_at)));
        if invoices.len() != fetched {
            tracing::warn!(
                tenant_id = %tenant_id,
                dropped = fetched - invoices.len(),
                "query source returned invoices outside the requested scope"
            );
        }
        tracing::debug!(
            tenant_id = %tenant_id,
            start = ?window.map(|w| w.start),
            end = ?window.map(|w| w.end),
            invoices = invoices.len(),
            "invoices selected"
        );
        Ok(invoices)
    }

    fn lookup_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> AnalyticsResult<Option<Product>> {
        let product = self
            .source
            .find_product(tenant_id, product_id)?
            .filter(|p| p.tenant_id == tenant_id);
        if product.is_none() {
            tracing::warn!(tenant_id = %tenant_id, product_id = %product_id, "product missing from catalog");
        }
        Ok(product)
    }

    fn products_for(
        &self,
        tenant_id: TenantId,
        invoices: &[Invoice],
    ) -> AnalyticsResult<HashMap<ProductId, Product>> {
        let mut products = HashMap::new();
        let mut misses = Vec::new();
        for line in invoices.iter().flat_map(|i| i.line_items.iter()) {
            if products.contains_key(&line.product_id) || misses.contains(&line.product_id) {
                continue;
            }
            match self.lookup_product(tenant_id, line.product_id)? {
                Some(p) => {
                    products.insert(line.product_id, p);
                }
                None => misses.push(line.product_id),
            }
        }
        Ok(products)
    }

    fn categories_for<'a>(
        &self,
        tenant_id: TenantId,
        products: impl Iterator<Item = &'a Product>,
    ) -> AnalyticsResult<HashMap<CategoryId, Category>> {
        let mut categories = HashMap::new();
        for product in products {
            if categories.contains_key(&product.category) {
                continue;
            }
            if let Some(c) = self
                .source
                .find_category(tenant_id, product.category)?
                .filter(|c| c.tenant_id == tenant_id)
            {
                categories.insert(product.category, c);
            }
        }
        Ok(categories)
    }
}
