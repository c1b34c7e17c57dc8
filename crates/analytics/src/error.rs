//! Analytics error model.

use thiserror::Error;

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Failure reported by a [`crate::QuerySource`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("query source failure: {0}")]
pub struct QueryError(pub String);

impl QueryError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Bad, missing or unknown range selector / granularity, or start > end.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A referenced record is missing where the report cannot degrade.
    #[error("not found: {0}")]
    NotFound(String),

    /// The query source failed; the report is abandoned.
    #[error(transparent)]
    UpstreamQuery(#[from] QueryError),

    /// A money total left the representable `Decimal` range.
    #[error("amount overflow while computing {0}")]
    Overflow(&'static str),
}

impl AnalyticsError {
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn overflow(what: &'static str) -> Self {
        Self::Overflow(what)
    }
}
