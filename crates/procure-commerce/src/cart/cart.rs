//! Cart and line item types.

use std::collections::HashSet;

use crate::cart::CartTotals;
use crate::catalog::{Price, Product};
use crate::error::CommerceError;
use crate::ids::ProductSlug;
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
///
/// Increments past this value are capped rather than rejected.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A shopping cart: line items in insertion order, at most one per product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Cart currency; fixed-price lines in other currencies are not summed.
    currency: Currency,
    /// Items in the cart.
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
        }
    }

    /// Rebuild a cart from stored line items.
    ///
    /// Returns an error if a slug repeats or a quantity is out of range.
    pub fn from_items(currency: Currency, items: Vec<LineItem>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            validate_quantity(item.quantity, 1)?;
            if !seen.insert(item.product.clone()) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate line item for {}",
                    item.product
                )));
            }
        }
        Ok(Self { currency, items })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Add a line item, or grow the existing line for the same product.
    ///
    /// Returns the resulting quantity of that line.
    pub fn add(&mut self, item: LineItem) -> Result<i64, CommerceError> {
        validate_quantity(item.quantity, 1)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.product == item.product) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_QUANTITY_PER_ITEM);
            return Ok(existing.quantity);
        }

        let quantity = item.quantity;
        self.items.push(item);
        Ok(quantity)
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity of 0 removes the line. Returns `Ok(false)` when the
    /// product has no line or the quantity is unchanged.
    pub fn update_quantity(
        &mut self,
        product: &ProductSlug,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        validate_quantity(quantity, 0)?;

        if quantity == 0 {
            return Ok(self.remove(product));
        }

        match self.items.iter_mut().find(|i| &i.product == product) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove the line for a product. Returns whether a line was removed.
    pub fn remove(&mut self, product: &ProductSlug) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product != product);
        self.items.len() < len_before
    }

    /// Remove every line. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Get the line for a product.
    pub fn item(&self, product: &ProductSlug) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product == product)
    }

    /// Total item count (sum of quantities).
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Compute derived totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.items, self.currency)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product being purchased.
    pub product: ProductSlug,
    /// Product name (denormalized for display).
    #[serde(default)]
    pub name: String,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// Price captured when the product was added.
    #[serde(default)]
    pub unit_price: Option<Price>,
}

impl LineItem {
    /// Create a line item without a price snapshot.
    pub fn new(product: impl Into<ProductSlug>, quantity: i64) -> Self {
        Self {
            product: product.into(),
            name: String::new(),
            quantity,
            unit_price: None,
        }
    }

    /// Create a line item capturing the product's current name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            product: product.slug.clone(),
            name: product.name.clone(),
            quantity,
            unit_price: Some(product.price),
        }
    }
}

/// Check `quantity` lies in `min..=MAX_QUANTITY_PER_ITEM`.
pub(crate) fn validate_quantity(quantity: i64, min: i64) -> Result<(), CommerceError> {
    if quantity < min {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}
