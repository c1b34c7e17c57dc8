//! Reporting boundary: validated report requests in, JSON bodies out.
//!
//! HTTP routing lives outside this workspace; this crate is the layer a
//! router (or the `tillbook-report` binary) calls into.

pub mod errors;
pub mod format;
pub mod report;
pub mod service;

pub use errors::{ErrorBody, ReportResult};
pub use report::{ReportArgs, ReportKind, run_report};
pub use service::ReportService;
