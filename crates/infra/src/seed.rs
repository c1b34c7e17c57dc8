//! JSON seed documents for demos and local runs.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use tillbook_inventory::InventoryItem;
use tillbook_invoicing::Invoice;
use tillbook_products::{Category, Product};

use crate::read_model::StoreError;
use crate::store::InMemoryPosStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Records to preload, possibly spanning several tenants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seed {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub inventory: Vec<InventoryItem>,
    pub invoices: Vec<Invoice>,
}

impl Seed {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn load_into(self, store: &InMemoryPosStore) -> Result<(), SeedError> {
        let counts = (
            self.categories.len(),
            self.products.len(),
            self.inventory.len(),
            self.invoices.len(),
        );
        for category in self.categories {
            store.put_category(category)?;
        }
        for product in self.products {
            store.put_product(product)?;
        }
        for item in self.inventory {
            store.put_inventory(item)?;
        }
        for invoice in self.invoices {
            store.put_invoice(invoice)?;
        }
        tracing::info!(
            categories = counts.0,
            products = counts.1,
            inventory = counts.2,
            invoices = counts.3,
            "seed loaded"
        );
        Ok(())
    }
}
