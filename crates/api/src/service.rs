//! Report service: the boundary in front of [`AnalyticsEngine`].
//!
//! Callers pass raw range/granularity tokens. They are validated before the
//! query source is touched, "now" comes from the injected [`Clock`], and every
//! failure leaves as an [`ErrorBody`].

use tracing::instrument;

use tillbook_analytics::{
    AnalyticsEngine, AnalyticsResult, BestSeller, Clock, Granularity, GrowthComparison,
    InventoryScope, InventorySummary, MonthlySales, PeriodicSeries, QuerySource, RangeRequest,
    RangeSelector, Requester, SalesSummary, SystemClock,
};
use tillbook_core::TenantId;
use tillbook_infra::AppConfig;

use crate::errors::{ErrorBody, ReportResult};

/// Granularity token meaning "daily buckets over explicit bounds".
pub const CUSTOM_GRANULARITY: &str = "custom";

#[derive(Debug, Clone)]
pub struct ReportService<S, C = SystemClock> {
    engine: AnalyticsEngine<S>,
    clock: C,
    default_range: RangeSelector,
}

impl<S> ReportService<S, SystemClock>
where
    S: QuerySource,
{
    pub fn new(source: S, config: &AppConfig) -> Self {
        Self::with_clock(source, SystemClock, config)
    }
}

impl<S, C> ReportService<S, C>
where
    S: QuerySource,
    C: Clock,
{
    pub fn with_clock(source: S, clock: C, config: &AppConfig) -> Self {
        Self {
            engine: AnalyticsEngine::new(source),
            clock,
            default_range: config.default_range,
        }
    }

    pub fn engine(&self) -> &AnalyticsEngine<S> {
        &self.engine
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub fn sales_summary(&self, tenant_id: TenantId, range: &RangeRequest) -> ReportResult<SalesSummary> {
        let selector = self.summary_range(range)?;
        Ok(self.engine.sales_summary(tenant_id, &selector, self.clock.now())?)
    }

    /// Vendors get their own inventory; admins may name `target`.
    #[instrument(skip(self), fields(tenant_id = %requester.tenant_id), err)]
    pub fn inventory_summary(
        &self,
        requester: &Requester,
        target: Option<TenantId>,
    ) -> ReportResult<InventorySummary> {
        let scope = InventoryScope::for_requester(requester, target);
        Ok(self.engine.inventory_summary(scope)?)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub fn growth(&self, tenant_id: TenantId, range: &RangeRequest) -> ReportResult<GrowthComparison> {
        let selector = self.summary_range(range)?;
        Ok(self.engine.growth(tenant_id, &selector, self.clock.now())?)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub fn best_sellers(&self, tenant_id: TenantId) -> ReportResult<Vec<BestSeller>> {
        Ok(self.engine.best_sellers(tenant_id)?)
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub fn monthly_rollup(&self, tenant_id: TenantId) -> ReportResult<Vec<MonthlySales>> {
        Ok(self.engine.monthly_rollup(tenant_id)?)
    }

    /// `granularity` is `daily`, `monthly`, `yearly` or `custom`; the last
    /// buckets by day and requires both bounds in `range`.
    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub fn periodic_series(
        &self,
        tenant_id: TenantId,
        granularity: &str,
        range: &RangeRequest,
    ) -> ReportResult<PeriodicSeries> {
        let (granularity, selector) = periodic_request(granularity, range)?;
        Ok(self
            .engine
            .periodic_series(tenant_id, granularity, selector.as_ref(), self.clock.now())?)
    }

    fn summary_range(&self, range: &RangeRequest) -> Result<RangeSelector, ErrorBody> {
        Ok(range.selector()?.unwrap_or(self.default_range))
    }
}

fn periodic_request(
    granularity: &str,
    range: &RangeRequest,
) -> AnalyticsResult<(Granularity, Option<RangeSelector>)> {
    if granularity.trim() == CUSTOM_GRANULARITY {
        let selector = RangeSelector::parse(
            CUSTOM_GRANULARITY,
            range.start_date.as_deref(),
            range.end_date.as_deref(),
        )?;
        return Ok((Granularity::Daily, Some(selector)));
    }
    Ok((granularity.trim().parse()?, range.selector()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillbook_analytics::{AnalyticsError, Lookback};

    #[test]
    fn custom_granularity_buckets_daily_over_bounds() {
        let (g, sel) =
            periodic_request("custom", &RangeRequest::custom("2024-01-01", "2024-01-31")).unwrap();
        assert_eq!(g, Granularity::Daily);
        assert!(matches!(sel, Some(RangeSelector::Custom { .. })));
    }

    #[test]
    fn custom_granularity_needs_both_bounds() {
        let range = RangeRequest { start_date: Some("2024-01-01".into()), ..RangeRequest::default() };
        assert!(matches!(
            periodic_request("custom", &range),
            Err(AnalyticsError::InvalidRange(_))
        ));
    }

    #[test]
    fn named_granularity_keeps_optional_range() {
        let (g, sel) = periodic_request("monthly", &RangeRequest::default()).unwrap();
        assert_eq!(g, Granularity::Monthly);
        assert_eq!(sel, None);

        let (_, sel) = periodic_request("yearly", &RangeRequest::named("week")).unwrap();
        assert_eq!(sel, Some(RangeSelector::Lookback(Lookback::Days(7))));
    }

    #[test]
    fn unknown_granularity_is_invalid_range() {
        assert!(matches!(
            periodic_request("hourly", &RangeRequest::default()),
            Err(AnalyticsError::InvalidRange(_))
        ));
    }
}
