use serde::Serialize;
use thiserror::Error;

use tillbook_analytics::AnalyticsError;

/// Message returned for failures whose detail must stay server-side.
pub const OPAQUE_FAILURE: &str = "report could not be computed";

/// Stable error shape returned to callers: `{"error": <code>, "message": <text>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{error}: {message}")]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub type ReportResult<T> = Result<T, ErrorBody>;

pub fn json_error(code: &'static str, message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: code,
        message: message.into(),
    }
}

pub fn analytics_error_to_body(err: AnalyticsError) -> ErrorBody {
    match err {
        AnalyticsError::InvalidRange(msg) => json_error("invalid_range", msg),
        AnalyticsError::NotFound(msg) => json_error("not_found", msg),
        AnalyticsError::UpstreamQuery(e) => {
            tracing::error!(error = %e, "report failed");
            json_error("internal_error", OPAQUE_FAILURE)
        }
        err @ AnalyticsError::Overflow(_) => {
            tracing::error!(error = %err, "report failed");
            json_error("internal_error", OPAQUE_FAILURE)
        }
    }
}

impl From<AnalyticsError> for ErrorBody {
    fn from(err: AnalyticsError) -> Self {
        analytics_error_to_body(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillbook_analytics::QueryError;

    #[test]
    fn upstream_detail_is_not_exposed() {
        let body = analytics_error_to_body(QueryError::new("connection reset by 10.0.0.7").into());
        assert_eq!(body.error, "internal_error");
        assert_eq!(body.message, OPAQUE_FAILURE);
    }

    #[test]
    fn overflow_is_opaque_internal_error() {
        let body = analytics_error_to_body(AnalyticsError::overflow("invoice totals"));
        assert_eq!(body, json_error("internal_error", OPAQUE_FAILURE));
    }

    #[test]
    fn invalid_range_keeps_message() {
        let body = analytics_error_to_body(AnalyticsError::invalid_range("unknown range 'fortnight'"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "invalid_range", "message": "unknown range 'fortnight'"})
        );
    }
}
