//! Sales and inventory analytics.
//!
//! Read-only reports computed from a tenant's invoice history and reference
//! catalog. Every report is a pure reduction over records fetched once from a
//! [`QuerySource`]; nothing here mutates state.
//!
//! - [`window`]: range selectors → concrete time windows
//! - [`category_merge`]: order-preserving per-category accumulation
//! - [`aggregate`]: the reducers behind each report
//! - [`engine`]: fetch + reduce, scoped to one tenant

pub mod aggregate;
pub mod category_merge;
pub mod clock;
pub mod engine;
pub mod error;
pub mod reports;
pub mod scope;
pub mod source;
#[cfg(test)]
mod testing;
pub mod window;

pub use category_merge::{CategoryAccumulator, CategoryTotal, merge_category_totals};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, AnalyticsResult, QueryError};
pub use reports::{
    BestSeller, CategorySales, GrowthComparison, InventorySummary, MonthlySales,
    PaymentMethodCounts, PeriodBucket, PeriodMetrics, PeriodicSeries, ProductSales, SalesSummary,
};
pub use scope::{InventoryScope, Requester, Role};
pub use source::QuerySource;
pub use window::{EndBound, Granularity, Lookback, RangeRequest, RangeSelector, TimeWindow};
