//! Product catalog lookups.

use std::collections::HashMap;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductSlug;

/// Source of product records.
///
/// The cart only asks whether a slug exists and reads its price and name.
pub trait ProductCatalog: Send + Sync {
    /// Look up a product by slug.
    fn product(&self, slug: &ProductSlug) -> Option<Product>;

    /// All products, in catalog order.
    fn products(&self) -> Vec<Product>;
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    index: HashMap<ProductSlug, usize>,
}

impl InMemoryCatalog {
    /// Build a catalog from products.
    ///
    /// Returns an error if two products share a slug.
    pub fn new(products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.slug.clone(), position).is_some() {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate product slug: {}",
                    product.slug
                )));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product(&self, slug: &ProductSlug) -> Option<Product> {
        self.index
            .get(slug)
            .and_then(|&position| self.products.get(position))
            .cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}
