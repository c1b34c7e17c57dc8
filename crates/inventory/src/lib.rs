//! Inventory reference data.
//!
//! Stock rows owned by a vendor, with a per-row low-stock warning threshold.
//! Pure data + derived values (no IO, no storage).

pub mod item;

pub use item::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryItem};
