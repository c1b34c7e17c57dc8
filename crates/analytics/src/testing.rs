//! Fixtures shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use tillbook_core::{CategoryId, InvoiceId, ProductId, TenantId};
use tillbook_invoicing::{Invoice, LineItem, PaymentMethod, PaymentStatus};
use tillbook_products::Product;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn product(tenant_id: TenantId, name: &str, category: CategoryId, price: i64) -> Product {
    Product::new(ProductId::new(), tenant_id, name, category, Decimal::from(price)).unwrap()
}

pub fn line(product: &Product, quantity: u32) -> LineItem {
    LineItem {
        product_id: product.id,
        name: product.name.clone(),
        quantity,
        unit_price: product.price,
    }
}

/// Invoice without GST, so `total_amount` equals the line subtotal.
pub fn invoice(
    tenant_id: TenantId,
    customer: &str,
    created_at: DateTime<Utc>,
    method: &str,
    line_items: Vec<LineItem>,
) -> Invoice {
    let subtotal: Decimal = line_items.iter().map(|l| l.line_total().unwrap()).sum();
    Invoice {
        id: InvoiceId::new(),
        tenant_id,
        customer_name: customer.to_string(),
        created_at,
        payment_method: PaymentMethod::from(method),
        payment_status: PaymentStatus::Paid,
        cash_received: Decimal::ZERO,
        subtotal,
        gst_amount: Decimal::ZERO,
        gst_percentage: Decimal::ZERO,
        total_amount: subtotal,
        line_items,
    }
}
