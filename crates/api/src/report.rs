//! Named reports for callers that select a report by string (the CLI).

use std::str::FromStr;

use serde_json::Value;

use tillbook_analytics::{Clock, QuerySource, RangeRequest, Requester};
use tillbook_core::TenantId;

use crate::errors::{ErrorBody, ReportResult, json_error};
use crate::format::{periodic_to_json, to_json};
use crate::service::ReportService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SalesSummary,
    InventorySummary,
    Growth,
    BestSellers,
    MonthlyRollup,
    PeriodicSeries,
}

impl ReportKind {
    pub const NAMES: [&'static str; 6] =
        ["sales-summary", "inventory", "growth", "best-sellers", "monthly", "periodic"];
}

impl FromStr for ReportKind {
    type Err = ErrorBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales-summary" => Ok(ReportKind::SalesSummary),
            "inventory" => Ok(ReportKind::InventorySummary),
            "growth" => Ok(ReportKind::Growth),
            "best-sellers" => Ok(ReportKind::BestSellers),
            "monthly" => Ok(ReportKind::MonthlyRollup),
            "periodic" => Ok(ReportKind::PeriodicSeries),
            other => Err(json_error(
                "unknown_report",
                format!("unknown report '{other}' (expected one of: {})", Self::NAMES.join(", ")),
            )),
        }
    }
}

/// Positional report arguments.
///
/// `selector` is a range token for summary reports and a granularity token
/// for the periodic series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArgs {
    pub selector: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportArgs {
    fn range(&self) -> RangeRequest {
        RangeRequest {
            range: self.selector.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }

    /// Bounds only; the selector names the granularity.
    fn bounds(&self) -> RangeRequest {
        match (&self.start_date, &self.end_date) {
            (None, None) => RangeRequest::default(),
            _ => RangeRequest {
                range: Some("custom".to_string()),
                start_date: self.start_date.clone(),
                end_date: self.end_date.clone(),
            },
        }
    }
}

/// Compute one report for `tenant_id` and format it. Inventory is read with
/// the tenant's own vendor scope.
pub fn run_report<S, C>(
    service: &ReportService<S, C>,
    tenant_id: TenantId,
    kind: ReportKind,
    args: &ReportArgs,
) -> ReportResult<Value>
where
    S: QuerySource,
    C: Clock,
{
    match kind {
        ReportKind::SalesSummary => to_json(&service.sales_summary(tenant_id, &args.range())?),
        ReportKind::InventorySummary => {
            to_json(&service.inventory_summary(&Requester::vendor(tenant_id), None)?)
        }
        ReportKind::Growth => to_json(&service.growth(tenant_id, &args.range())?),
        ReportKind::BestSellers => to_json(&service.best_sellers(tenant_id)?),
        ReportKind::MonthlyRollup => to_json(&service.monthly_rollup(tenant_id)?),
        ReportKind::PeriodicSeries => {
            let granularity = args.selector.as_deref().unwrap_or("daily");
            periodic_to_json(&service.periodic_series(tenant_id, granularity, &args.bounds())?)
        }
    }
}
