//! Product catalog reference data.
//!
//! Products and categories are owned by a tenant and looked up by the
//! billing workflow (price/name snapshot) and by analytics (enrichment).

pub mod category;
pub mod product;

pub use category::Category;
pub use product::Product;
