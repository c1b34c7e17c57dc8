//! Report reducers.
//!
//! Each function takes records already fetched for one tenant (and window)
//! and produces a report in a single pass plus a final sort where needed.
//! Money arithmetic is checked; overflow aborts the report with
//! [`AnalyticsError::Overflow`].

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;

use tillbook_core::{CategoryId, InvoiceId, ProductId};
use tillbook_inventory::InventoryItem;
use tillbook_invoicing::{Invoice, PaymentMethod};
use tillbook_products::{Category, Product};

use crate::category_merge::merge_category_totals;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::reports::{
    CategorySales, GrowthComparison, InventorySummary, MonthlySales, PaymentMethodCounts,
    PeriodBucket, PeriodMetrics, PeriodicSeries, ProductSales, SalesSummary,
};
use crate::window::Granularity;

/// Size of every "top" list.
pub const TOP_N: usize = 5;

fn add(acc: Decimal, amount: Decimal, what: &'static str) -> AnalyticsResult<Decimal> {
    acc.checked_add(amount).ok_or_else(|| AnalyticsError::overflow(what))
}

fn checked_sum<I>(amounts: I, what: &'static str) -> AnalyticsResult<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        add(acc, amount.ok_or_else(|| AnalyticsError::overflow(what))?, what)
    })
}

struct ProductRow {
    product_id: ProductId,
    name: String,
    category: Option<CategoryId>,
    quantity: u64,
    revenue: Decimal,
}

/// Sales summary over the given invoices.
///
/// Line items are grouped per product in order of first sale. Name and
/// category come from the live catalog; when a product is missing there the
/// invoice's snapshot name is used and the category is left empty.
pub fn summarize_sales(
    invoices: &[Invoice],
    products: &HashMap<ProductId, Product>,
    categories: &HashMap<CategoryId, Category>,
) -> AnalyticsResult<SalesSummary> {
    const WHAT: &str = "sales summary";

    let mut rows: Vec<ProductRow> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();
    let mut source_invoices: HashSet<InvoiceId> = HashSet::new();
    let mut customers: HashSet<&str> = HashSet::new();

    for invoice in invoices {
        for line in &invoice.line_items {
            source_invoices.insert(invoice.id);
            customers.insert(invoice.customer_name.as_str());

            let pos = *index.entry(line.product_id).or_insert_with(|| {
                let live = products.get(&line.product_id);
                rows.push(ProductRow {
                    product_id: line.product_id,
                    name: live.map_or_else(|| line.name.clone(), |p| p.name.clone()),
                    category: live.map(|p| p.category),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
                rows.len() - 1
            });
            let row = &mut rows[pos];
            row.quantity += u64::from(line.quantity);
            let line_total = line.line_total().ok_or_else(|| AnalyticsError::overflow(WHAT))?;
            row.revenue = add(row.revenue, line_total, WHAT)?;
        }
    }

    let total_sales = checked_sum(rows.iter().map(|r| Some(r.revenue)), WHAT)?;

    let sales_by_category = merge_category_totals(rows.iter().map(|r| (r.category, r.revenue)))
        .ok_or_else(|| AnalyticsError::overflow(WHAT))?
        .into_iter()
        .map(|t| CategorySales {
            category: t.category,
            name: t
                .category
                .and_then(|id| categories.get(&id))
                .map(|c| c.name.clone()),
            amount: t.amount,
        })
        .collect();

    let mut ranked: Vec<&ProductRow> = rows.iter().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.product_id.cmp(&b.product_id)));
    let top_products = ranked
        .into_iter()
        .take(TOP_N)
        .map(|r| ProductSales {
            product_id: r.product_id,
            name: r.name.clone(),
            quantity: r.quantity,
            total: r.revenue,
        })
        .collect();

    Ok(SalesSummary {
        total_sales,
        total_transactions: source_invoices.len() as u64,
        top_products,
        sales_by_category,
        total_customers: customers.len() as u64,
    })
}

pub fn summarize_inventory(items: &[InventoryItem]) -> AnalyticsResult<InventorySummary> {
    let categories: HashSet<CategoryId> = items.iter().filter_map(|i| i.category).collect();
    Ok(InventorySummary {
        total_stock_value: checked_sum(items.iter().map(InventoryItem::stock_value), "stock value")?,
        low_stock_item_count: items.iter().filter(|i| i.is_low_stock()).count() as u64,
        total_items: items.len() as u64,
        total_categories: categories.len() as u64,
    })
}

pub fn sum_totals(invoices: &[Invoice]) -> AnalyticsResult<Decimal> {
    checked_sum(invoices.iter().map(|i| Some(i.total_amount)), "invoice totals")
}

/// Percent change; from a zero baseline any positive amount counts as +100%.
pub fn growth_rate(current: Decimal, previous: Decimal) -> AnalyticsResult<Decimal> {
    if !previous.is_zero() {
        current
            .checked_sub(previous)
            .and_then(|delta| delta.checked_div(previous))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| AnalyticsError::overflow("growth rate"))
    } else if current > Decimal::ZERO {
        Ok(Decimal::ONE_HUNDRED)
    } else {
        Ok(Decimal::ZERO)
    }
}

pub fn compare_growth(current: Decimal, previous: Decimal) -> AnalyticsResult<GrowthComparison> {
    Ok(GrowthComparison {
        growth_rate: growth_rate(current, previous)?,
        current,
        previous,
    })
}

/// Top products by total quantity sold, ties by product id.
///
/// Lines with zero quantity do not count as a sale.
pub fn rank_best_sellers(invoices: &[Invoice]) -> Vec<(ProductId, u64)> {
    let mut sold: HashMap<ProductId, u64> = HashMap::new();
    for line in invoices.iter().flat_map(|i| i.line_items.iter()) {
        if line.quantity == 0 {
            continue;
        }
        *sold.entry(line.product_id).or_default() += u64::from(line.quantity);
    }

    let mut ranked: Vec<(ProductId, u64)> = sold.into_iter().collect();
    ranked.sort_by_key(|(id, qty)| (Reverse(*qty), *id));
    ranked.truncate(TOP_N);
    ranked
}

/// Invoice count and revenue per calendar month (UTC), most recent first.
pub fn monthly_rollup(invoices: &[Invoice]) -> AnalyticsResult<Vec<MonthlySales>> {
    let mut months: BTreeMap<(i32, u32), (u64, Decimal)> = BTreeMap::new();
    for invoice in invoices {
        let key = (invoice.created_at.year(), invoice.created_at.month());
        let entry = months.entry(key).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = add(entry.1, invoice.total_amount, "monthly rollup")?;
    }

    Ok(months
        .into_iter()
        .rev()
        .map(|((year, month), (count, revenue))| MonthlySales {
            month,
            year,
            total_sales: count,
            total_revenue: revenue,
        })
        .collect())
}

/// Buckets by formatted key (ascending) plus selection-wide metrics.
pub fn periodic_series(
    invoices: &[Invoice],
    granularity: Granularity,
) -> AnalyticsResult<PeriodicSeries> {
    let mut buckets: BTreeMap<String, PeriodBucket> = BTreeMap::new();
    for invoice in invoices {
        let key = granularity.bucket_key(invoice.created_at);
        let bucket = buckets.entry(key.clone()).or_insert_with(|| PeriodBucket {
            bucket_key: key,
            total_amount: Decimal::ZERO,
            order_count: 0,
            transactions: Vec::new(),
        });
        bucket.total_amount = add(bucket.total_amount, invoice.total_amount, "periodic series")?;
        bucket.order_count += 1;
        bucket.transactions.push(invoice.clone());
    }

    Ok(PeriodicSeries {
        buckets: buckets.into_values().collect(),
        metrics: period_metrics(invoices)?,
    })
}

pub fn period_metrics(invoices: &[Invoice]) -> AnalyticsResult<PeriodMetrics> {
    let total_sales = sum_totals(invoices)?;
    let total_orders = invoices.len() as u64;
    let avg_order_value = if total_orders == 0 {
        Decimal::ZERO
    } else {
        total_sales
            .checked_div(Decimal::from(total_orders))
            .ok_or_else(|| AnalyticsError::overflow("average order value"))?
            .round_dp(2)
    };

    // Only the two billing methods are counted; anything else is ignored.
    let mut counts = PaymentMethodCounts::default();
    for invoice in invoices {
        match invoice.payment_method {
            PaymentMethod::Cash => counts.cash += 1,
            PaymentMethod::Online => counts.online += 1,
            PaymentMethod::Other(_) => {}
        }
    }

    Ok(PeriodMetrics {
        total_sales,
        total_orders,
        avg_order_value,
        payment_method_counts: counts,
    })
}
