//! Report shapes. Computed per request, never persisted.

use rust_decimal::Decimal;
use serde::Serialize;

use tillbook_core::{CategoryId, ProductId};
use tillbook_invoicing::Invoice;

/// Revenue for one product within the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    /// `None` for products missing from the live catalog.
    pub category: Option<CategoryId>,
    pub name: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub total_transactions: u64,
    /// At most five, highest revenue first.
    pub top_products: Vec<ProductSales>,
    pub sales_by_category: Vec<CategorySales>,
    pub total_customers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_stock_value: Decimal,
    pub low_stock_item_count: u64,
    pub total_items: u64,
    pub total_categories: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthComparison {
    /// Percent change from `previous` to `current`.
    pub growth_rate: Decimal,
    pub current: Decimal,
    pub previous: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    pub product_id: ProductId,
    /// Current catalog name; `None` if the product no longer exists.
    pub name: Option<String>,
    pub total_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub month: u32,
    pub year: i32,
    /// Number of invoices.
    pub total_sales: u64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub bucket_key: String,
    pub total_amount: Decimal,
    pub order_count: u64,
    pub transactions: Vec<Invoice>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentMethodCounts {
    pub cash: u64,
    pub online: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics {
    pub total_sales: Decimal,
    pub total_orders: u64,
    /// Mean invoice total, rounded to 2 decimal places.
    pub avg_order_value: Decimal,
    pub payment_method_counts: PaymentMethodCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodicSeries {
    /// Chronological.
    pub buckets: Vec<PeriodBucket>,
    pub metrics: PeriodMetrics,
}

impl PeriodicSeries {
    /// All matching invoices, bucket by bucket.
    pub fn transactions(&self) -> impl Iterator<Item = &Invoice> {
        self.buckets.iter().flat_map(|b| b.transactions.iter())
    }
}
