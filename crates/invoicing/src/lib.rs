//! Invoicing domain module.
//!
//! Invoices carry a value snapshot of each sold product (name, unit price)
//! taken when the invoice is issued. After issuing, only the payment status
//! changes.

pub mod invoice;
pub mod issue;

pub use invoice::{Invoice, LineItem, PaymentMethod, PaymentStatus};
pub use issue::{DraftLine, InvoiceDraft, issue_invoice};
