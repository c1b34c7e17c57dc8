//! Time window resolution.
//!
//! A [`RangeSelector`] is parsed (and validated) from request tokens before
//! any query runs; it resolves against an explicit `now` so results are
//! reproducible.
//!
//! Window convention: selectors resolve to the closed window `[start, end]`.
//! The preceding window used for growth comparison is half-open
//! `[start - (end - start), start)`.

use core::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndBound {
    Inclusive,
    Exclusive,
}

/// Concrete `[start, end]` / `[start, end)` instant pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub end_bound: EndBound,
}

impl TimeWindow {
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, end_bound: EndBound::Inclusive }
    }

    pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, end_bound: EndBound::Exclusive }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if at < self.start {
            return false;
        }
        match self.end_bound {
            EndBound::Inclusive => at <= self.end,
            EndBound::Exclusive => at < self.end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Window of equal duration immediately before `start`, end-exclusive.
    pub fn preceding(&self) -> TimeWindow {
        TimeWindow::half_open(self.start - self.duration(), self.start)
    }
}

/// Fixed lookback from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(u32),
    /// Calendar months (end-of-month clamped: Mar 31 - 1 month = Feb 28/29).
    Months(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelector {
    Lookback(Lookback),
    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl RangeSelector {
    pub const DAYS_30: RangeSelector = RangeSelector::Lookback(Lookback::Days(30));

    /// Parse a selector token, with bounds for `custom`.
    pub fn parse(token: &str, start: Option<&str>, end: Option<&str>) -> AnalyticsResult<Self> {
        if token == "custom" {
            return match (start, end) {
                (Some(s), Some(e)) => Self::custom(parse_bound(s)?, parse_bound(e)?),
                _ => Err(AnalyticsError::invalid_range(
                    "custom range requires both start and end dates",
                )),
            };
        }
        token.parse()
    }

    pub fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> AnalyticsResult<Self> {
        if start > end {
            return Err(AnalyticsError::invalid_range("start date is after end date"));
        }
        Ok(Self::Custom { start, end })
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> AnalyticsResult<TimeWindow> {
        let start = match *self {
            RangeSelector::Custom { start, end } => return Ok(TimeWindow::closed(start, end)),
            RangeSelector::Lookback(Lookback::Days(days)) => {
                now.checked_sub_signed(Duration::days(i64::from(days)))
            }
            RangeSelector::Lookback(Lookback::Months(months)) => {
                now.checked_sub_months(Months::new(months))
            }
        };
        let start = start.ok_or_else(|| AnalyticsError::invalid_range("lookback out of range"))?;
        Ok(TimeWindow::closed(start, now))
    }
}

impl FromStr for RangeSelector {
    type Err = AnalyticsError;

    /// Named tokens only; `custom` needs bounds (see [`RangeSelector::parse`]).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lookback = match s {
            "7d" | "week" => Lookback::Days(7),
            "30d" => Lookback::Days(30),
            "90d" => Lookback::Days(90),
            "1y" => Lookback::Days(365),
            "month" => Lookback::Months(1),
            "year" => Lookback::Months(12),
            "custom" => {
                return Err(AnalyticsError::invalid_range(
                    "custom range requires both start and end dates",
                ));
            }
            other => {
                return Err(AnalyticsError::invalid_range(format!(
                    "unknown range '{other}' (expected one of: 7d, 30d, 90d, 1y, week, month, year, custom)"
                )));
            }
        };
        Ok(RangeSelector::Lookback(lookback))
    }
}

/// Range query parameters as they arrive from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl RangeRequest {
    pub fn named(token: impl Into<String>) -> Self {
        Self { range: Some(token.into()), ..Self::default() }
    }

    pub fn custom(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            range: Some("custom".to_string()),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
        }
    }

    /// `Ok(None)` when no selector was supplied.
    pub fn selector(&self) -> AnalyticsResult<Option<RangeSelector>> {
        self.range
            .as_deref()
            .map(|token| {
                RangeSelector::parse(token, self.start_date.as_deref(), self.end_date.as_deref())
            })
            .transpose()
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_bound(s: &str) -> AnalyticsResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AnalyticsError::invalid_range(format!("invalid date '{s}'")))
}

/// Bucket size for the periodic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` in UTC.
    pub fn bucket_key(&self, at: DateTime<Utc>) -> String {
        let fmt = match self {
            Granularity::Daily => "%Y-%m-%d",
            Granularity::Monthly => "%Y-%m",
            Granularity::Yearly => "%Y",
        };
        at.format(fmt).to_string()
    }
}

impl FromStr for Granularity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Granularity::Daily),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            other => Err(AnalyticsError::invalid_range(format!(
                "unknown granularity '{other}' (expected one of: daily, monthly, yearly)"
            ))),
        }
    }
}
