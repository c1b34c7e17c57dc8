//! Infrastructure layer: storage adapters, configuration, seed loading.

pub mod config;
pub mod read_model;
pub mod seed;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use read_model::{InMemoryTenantStore, StoreError, TenantStore};
pub use seed::{Seed, SeedError};
pub use store::{InMemoryPosStore, NewInventoryRow};
