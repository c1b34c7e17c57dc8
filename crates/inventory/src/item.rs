use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tillbook_core::{CategoryId, DomainError, DomainResult, Entity, InventoryItemId, TenantId};

/// Threshold applied when a row is registered without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

fn default_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub tenant_id: TenantId,
    pub name: String,
    /// Uncategorized rows are allowed.
    #[serde(default)]
    pub category: Option<CategoryId>,
    pub quantity: i64,
    pub price: Decimal,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i64,
}

impl InventoryItem {
    pub fn new(
        id: InventoryItemId,
        tenant_id: TenantId,
        name: impl Into<String>,
        quantity: i64,
        price: Decimal,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            id,
            tenant_id,
            name: name.trim().to_string(),
            category: None,
            quantity,
            price,
            supplier: None,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        })
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// quantity × price; `None` if the product overflows.
    pub fn stock_value(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.price)
    }

    /// Low stock includes the threshold itself.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
