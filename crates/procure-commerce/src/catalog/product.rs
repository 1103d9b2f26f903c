//! Product types.

use crate::ids::{PartNumber, ProductSlug};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    /// Ships from stock.
    #[default]
    InStock,
    /// Sourced on request from the supplier.
    OnRequest,
    /// Currently unavailable.
    OutOfStock,
}

impl StockStatus {
    /// All statuses, in display order.
    pub const ALL: [StockStatus; 3] = [
        StockStatus::InStock,
        StockStatus::OnRequest,
        StockStatus::OutOfStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::OnRequest => "on-request",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in-stock" => Some(StockStatus::InStock),
            "on-request" => Some(StockStatus::OnRequest),
            "out-of-stock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::OnRequest => "On Request",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// How a product is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Price {
    /// A fixed unit price.
    Fixed { amount: Money },
    /// Price must be quoted manually.
    OnRequest,
}

impl Price {
    /// Fixed price in the given amount.
    pub fn fixed(amount: Money) -> Self {
        Price::Fixed { amount }
    }

    /// The unit amount, if the price is fixed.
    pub fn amount(&self) -> Option<Money> {
        match self {
            Price::Fixed { amount } => Some(*amount),
            Price::OnRequest => None,
        }
    }

    pub fn is_on_request(&self) -> bool {
        matches!(self, Price::OnRequest)
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// URL-friendly slug (unique).
    pub slug: ProductSlug,
    /// Manufacturer part number (unique).
    pub part_number: PartNumber,
    /// Product name.
    pub name: String,
    /// Image references; the first one is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Stock availability.
    #[serde(default)]
    pub stock_status: StockStatus,
    /// Unit price.
    pub price: Price,
}

impl Product {
    /// Create a product with no images.
    pub fn new(
        slug: impl Into<ProductSlug>,
        part_number: impl Into<PartNumber>,
        name: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            slug: slug.into(),
            part_number: part_number.into(),
            name: name.into(),
            images: Vec::new(),
            stock_status: StockStatus::InStock,
            price,
        }
    }

    /// Set the stock status.
    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = status;
        self
    }

    /// Append an image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }

    /// The primary image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
