use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tillbook_core::{Entity, InvoiceId, ProductId, TenantId};

/// How the customer paid.
///
/// Billing only produces `cash` and `online`; stored records may carry other
/// values (imports, legacy data) which are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Online,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
            PaymentMethod::Other(s) => s,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "cash" => PaymentMethod::Cash,
            "online" => PaymentMethod::Online,
            _ => PaymentMethod::Other(value),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        PaymentMethod::from(value.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

/// One product entry within an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    /// Product name at the time the invoice was issued.
    pub name: String,
    pub quantity: u32,
    /// Unit price at the time the invoice was issued.
    pub unit_price: Decimal,
}

impl LineItem {
    /// quantity × unit price; `None` if the product overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// Issued invoice.
///
/// Invariant (maintained by `issue_invoice`, assumed for imported data):
/// `total_amount = subtotal + gst_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub cash_received: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub gst_amount: Decimal,
    #[serde(default)]
    pub gst_percentage: Decimal,
    pub total_amount: Decimal,
    pub line_items: Vec<LineItem>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Change handed back for cash payments; zero otherwise.
    pub fn change_due(&self) -> Decimal {
        match self.payment_method {
            PaymentMethod::Cash => self
                .cash_received
                .checked_sub(self.total_amount)
                .map_or(Decimal::ZERO, |change| change.max(Decimal::ZERO)),
            _ => Decimal::ZERO,
        }
    }

    /// Settle the invoice. Marking an already-paid invoice is a no-op.
    pub fn mark_paid(&mut self) {
        if self.payment_status == PaymentStatus::Paid {
            return;
        }
        self.payment_status = PaymentStatus::Paid;
        tracing::debug!(invoice_id = %self.id, tenant_id = %self.tenant_id, "invoice marked paid");
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_payment_method_is_kept_verbatim() {
        let m: PaymentMethod = serde_json::from_str("\"giftcard\"").unwrap();
        assert_eq!(m, PaymentMethod::Other("giftcard".to_string()));
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"giftcard\"");
    }

    #[test]
    fn known_payment_methods_parse_to_variants() {
        assert_eq!(PaymentMethod::from("cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::from("online"), PaymentMethod::Online);
        assert_eq!(PaymentMethod::Online.to_string(), "online");
    }

    #[test]
    fn line_total_multiplies_quantity_by_unit_price() {
        let line = LineItem {
            product_id: ProductId::new(),
            name: "Samosa".to_string(),
            quantity: 3,
            unit_price: Decimal::new(1250, 2),
        };
        assert_eq!(line.line_total(), Some(Decimal::new(3750, 2)));
    }
}
