//! Report formatter: engine results to the JSON bodies callers receive.

use serde::Serialize;
use serde_json::{Value, json};

use tillbook_analytics::PeriodicSeries;

use crate::errors::{OPAQUE_FAILURE, ReportResult, json_error};

pub fn to_json<T: Serialize>(report: &T) -> ReportResult<Value> {
    serde_json::to_value(report).map_err(|e| {
        tracing::error!(error = %e, "report serialization failed");
        json_error("internal_error", OPAQUE_FAILURE)
    })
}

/// `{"sales": [...buckets], "transactions": [...], "metrics": {...}}`.
///
/// `transactions` flattens every bucket's invoices in bucket order.
pub fn periodic_to_json(series: &PeriodicSeries) -> ReportResult<Value> {
    let transactions: Vec<_> = series.transactions().collect();
    Ok(json!({
        "sales": to_json(&series.buckets)?,
        "transactions": to_json(&transactions)?,
        "metrics": to_json(&series.metrics)?,
    }))
}
