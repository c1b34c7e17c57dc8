//! Invoice issuing: validate a draft, snapshot catalog data, compute GST.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tillbook_core::{DomainError, DomainResult, InvoiceId, ProductId, TenantId};
use tillbook_products::Product;

use crate::invoice::{Invoice, LineItem, PaymentMethod, PaymentStatus};

/// Requested product + quantity (prices always come from the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Billing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub tenant_id: TenantId,
    pub invoice_id: InvoiceId,
    pub customer_name: String,
    pub lines: Vec<DraftLine>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub cash_received: Decimal,
    #[serde(default)]
    pub gst_percentage: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Issue an invoice from a draft.
///
/// `find_product` resolves catalog entries; products belonging to another
/// tenant are treated as missing.
pub fn issue_invoice<F>(draft: &InvoiceDraft, find_product: F) -> DomainResult<Invoice>
where
    F: Fn(ProductId) -> Option<Product>,
{
    if draft.customer_name.trim().is_empty() {
        return Err(DomainError::validation("customer name cannot be empty"));
    }
    if draft.lines.is_empty() {
        return Err(DomainError::validation("invoice must have at least one line"));
    }
    if draft.gst_percentage.is_sign_negative() {
        return Err(DomainError::validation("gst percentage cannot be negative"));
    }
    match draft.payment_method {
        PaymentMethod::Cash | PaymentMethod::Online => {}
        PaymentMethod::Other(ref m) => {
            return Err(DomainError::validation(format!("unsupported payment method: {m}")));
        }
    }

    let mut line_items = Vec::with_capacity(draft.lines.len());
    for line in &draft.lines {
        if line.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let product = find_product(line.product_id)
            .filter(|p| p.tenant_id == draft.tenant_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", line.product_id)))?;

        line_items.push(LineItem {
            product_id: product.id,
            name: product.name,
            quantity: line.quantity,
            unit_price: product.price,
        });
    }

    let out_of_range = || DomainError::validation("invoice amount out of range");
    let subtotal = line_items
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.line_total()?))
        .ok_or_else(out_of_range)?;
    let gst_amount = subtotal
        .checked_mul(draft.gst_percentage)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(out_of_range)?
        .round_dp(2);
    let total_amount = subtotal.checked_add(gst_amount).ok_or_else(out_of_range)?;

    let cash_received = match draft.payment_method {
        PaymentMethod::Cash => {
            if draft.cash_received < total_amount {
                return Err(DomainError::validation("insufficient cash received"));
            }
            draft.cash_received
        }
        _ => Decimal::ZERO,
    };

    tracing::debug!(
        tenant_id = %draft.tenant_id,
        invoice_id = %draft.invoice_id,
        lines = line_items.len(),
        %total_amount,
        "invoice issued"
    );

    Ok(Invoice {
        id: draft.invoice_id,
        tenant_id: draft.tenant_id,
        customer_name: draft.customer_name.trim().to_string(),
        created_at: draft.created_at,
        payment_method: draft.payment_method.clone(),
        payment_status: PaymentStatus::Pending,
        cash_received,
        subtotal,
        gst_amount,
        gst_percentage: draft.gst_percentage,
        total_amount,
        line_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tillbook_core::CategoryId;

    fn product(tenant_id: TenantId, name: &str, cents: i64) -> Product {
        Product::new(
            ProductId::new(),
            tenant_id,
            name,
            CategoryId::new(),
            Decimal::new(cents, 2),
        )
        .unwrap()
    }

    fn draft(tenant_id: TenantId, lines: Vec<DraftLine>, method: PaymentMethod) -> InvoiceDraft {
        InvoiceDraft {
            tenant_id,
            invoice_id: InvoiceId::new(),
            customer_name: "Asha".to_string(),
            lines,
            payment_method: method,
            cash_received: Decimal::ZERO,
            gst_percentage: Decimal::new(18, 0),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn computes_gst_and_snapshots_catalog_data() {
        let tenant = TenantId::new();
        let tea = product(tenant, "Tea", 1000);
        let cake = product(tenant, "Cake", 2550);
        let catalog = vec![tea.clone(), cake.clone()];

        let d = draft(
            tenant,
            vec![
                DraftLine { product_id: tea.id, quantity: 2 },
                DraftLine { product_id: cake.id, quantity: 1 },
            ],
            PaymentMethod::Online,
        );

        let invoice =
            issue_invoice(&d, |id| catalog.iter().find(|p| p.id == id).cloned()).unwrap();

        assert_eq!(invoice.subtotal, Decimal::new(4550, 2));
        // 18% of 45.50 = 8.19
        assert_eq!(invoice.gst_amount, Decimal::new(819, 2));
        assert_eq!(invoice.total_amount, Decimal::new(5369, 2));
        assert_eq!(invoice.cash_received, Decimal::ZERO);
        assert_eq!(invoice.payment_status, PaymentStatus::Pending);
        assert_eq!(invoice.line_items[1].name, "Cake");
        assert_eq!(invoice.line_items[1].unit_price, Decimal::new(2550, 2));
    }

    #[test]
    fn insufficient_cash_is_rejected() {
        let tenant = TenantId::new();
        let tea = product(tenant, "Tea", 1000);
        let mut d = draft(
            tenant,
            vec![DraftLine { product_id: tea.id, quantity: 1 }],
            PaymentMethod::Cash,
        );
        d.cash_received = Decimal::new(1000, 2);

        let err = issue_invoice(&d, |_| Some(tea.clone())).unwrap_err();
        assert_eq!(err, DomainError::validation("insufficient cash received"));
    }

    #[test]
    fn cash_payment_records_change() {
        let tenant = TenantId::new();
        let tea = product(tenant, "Tea", 1000);
        let mut d = draft(
            tenant,
            vec![DraftLine { product_id: tea.id, quantity: 1 }],
            PaymentMethod::Cash,
        );
        d.gst_percentage = Decimal::ZERO;
        d.cash_received = Decimal::new(20, 0);

        let invoice = issue_invoice(&d, |_| Some(tea.clone())).unwrap();
        assert_eq!(invoice.change_due(), Decimal::new(10, 0));
    }

    #[test]
    fn product_from_another_tenant_is_not_found() {
        let foreign = product(TenantId::new(), "Tea", 1000);
        let d = draft(
            TenantId::new(),
            vec![DraftLine { product_id: foreign.id, quantity: 1 }],
            PaymentMethod::Online,
        );

        let err = issue_invoice(&d, |_| Some(foreign.clone())).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let tenant = TenantId::new();
        let tea = product(tenant, "Tea", 1000);
        let d = draft(
            tenant,
            vec![DraftLine { product_id: tea.id, quantity: 0 }],
            PaymentMethod::Online,
        );
        let err = issue_invoice(&d, |_| Some(tea.clone())).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn oversized_amounts_are_rejected_not_panicking() {
        let tenant = TenantId::new();
        let mut bulk = product(tenant, "Bulk", 1);
        bulk.price = Decimal::MAX;
        let d = draft(
            tenant,
            vec![DraftLine { product_id: bulk.id, quantity: 2 }],
            PaymentMethod::Online,
        );

        let err = issue_invoice(&d, |_| Some(bulk.clone())).unwrap_err();
        assert_eq!(err, DomainError::validation("invoice amount out of range"));
    }

    #[test]
    fn mark_paid_is_idempotent() {
        let tenant = TenantId::new();
        let tea = product(tenant, "Tea", 1000);
        let d = draft(
            tenant,
            vec![DraftLine { product_id: tea.id, quantity: 1 }],
            PaymentMethod::Online,
        );
        let mut invoice = issue_invoice(&d, |_| Some(tea.clone())).unwrap();
        invoice.mark_paid();
        invoice.mark_paid();
        assert!(invoice.is_paid());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: issued totals always equal subtotal + GST.
        #[test]
        fn total_is_subtotal_plus_gst(
            qtys in prop::collection::vec(1u32..50, 1..6),
            cents in 1i64..100_000,
            gst in 0i64..30,
        ) {
            let tenant = TenantId::new();
            let item = product(tenant, "Thali", cents);
            let mut d = draft(
                tenant,
                qtys.iter().map(|q| DraftLine { product_id: item.id, quantity: *q }).collect(),
                PaymentMethod::Online,
            );
            d.gst_percentage = Decimal::new(gst, 0);

            let invoice = issue_invoice(&d, |_| Some(item.clone())).unwrap();
            prop_assert_eq!(invoice.total_amount, invoice.subtotal + invoice.gst_amount);
            let expected: u32 = qtys.iter().sum();
            prop_assert_eq!(invoice.subtotal, Decimal::from(expected) * Decimal::new(cents, 2));
        }
    }
}
