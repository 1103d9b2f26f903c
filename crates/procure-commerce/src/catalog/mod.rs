//! Product catalog module.
//!
//! Contains product types and the catalog lookup the cart validates against.

mod product;
mod provider;

pub use product::{Price, Product, StockStatus};
pub use provider::{InMemoryCatalog, ProductCatalog};
