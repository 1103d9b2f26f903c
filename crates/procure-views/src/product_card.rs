//! Product card for grids and listings.

use procure_commerce::cart::{CartHandle, CartSnapshot};
use procure_commerce::catalog::{Price, Product, StockStatus};
use procure_commerce::CommerceError;

use crate::html::escape_html;

const PLACEHOLDER_IMAGE: &str = "/images/placeholder-part.svg";

/// CSS class for a stock status.
pub fn stock_status_class(status: StockStatus) -> &'static str {
    match status {
        StockStatus::InStock => "stock-status stock-status--in-stock",
        StockStatus::OnRequest => "stock-status stock-status--on-request",
        StockStatus::OutOfStock => "stock-status stock-status--out-of-stock",
    }
}

/// The card's call to action, chosen by how the product is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Price must be quoted.
    RequestQuote,
    /// Fixed price; go to the product page.
    ViewDetails,
}

impl CardAction {
    pub fn for_price(price: &Price) -> Self {
        if price.is_on_request() {
            CardAction::RequestQuote
        } else {
            CardAction::ViewDetails
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardAction::RequestQuote => "Request Quote",
            CardAction::ViewDetails => "View Details",
        }
    }

    pub fn button_class(&self) -> &'static str {
        match self {
            CardAction::RequestQuote => "btn btn-secondary",
            CardAction::ViewDetails => "btn btn-primary",
        }
    }
}

/// A single product card bound to the shared cart.
#[derive(Debug, Clone)]
pub struct ProductCard {
    product: Product,
    cart: CartHandle,
}

impl ProductCard {
    pub fn new(product: Product, cart: CartHandle) -> Self {
        Self { product, cart }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn action(&self) -> CardAction {
        CardAction::for_price(&self.product.price)
    }

    /// Product page URL.
    pub fn href(&self) -> String {
        format!("/products/{}", self.product.slug)
    }

    /// Put one unit of this product in the cart.
    pub fn add_to_cart(&self) -> Result<CartSnapshot, CommerceError> {
        self.cart.add_item(&self.product.slug, 1)
    }

    pub fn render(&self) -> String {
        let product = &self.product;
        let href = escape_html(&self.href());
        let name = escape_html(&product.name);
        let image = escape_html(product.primary_image().unwrap_or(PLACEHOLDER_IMAGE));
        let action = self.action();

        let in_cart = self.cart.snapshot().quantity_of(&product.slug);
        let in_cart_html = if in_cart > 0 {
            format!(r#"<p class="in-cart">In cart: {}</p>"#, in_cart)
        } else {
            String::new()
        };

        format!(
            r#"<article class="product-card" data-product-slug="{slug}">
    <a href="{href}" class="product-image-link">
        <div class="product-image">
            <img src="{image}" alt="{name}" loading="lazy">
        </div>
    </a>
    <div class="product-info">
        <a href="{href}">
            <h3 class="product-name">{name}</h3>
        </a>
        <p class="part-number">Part Number: {part_number}</p>
        <p class="{stock_class}">{stock_label}</p>
        {in_cart_html}
        <a href="{href}">
            <button class="{button_class}">{button_label}</button>
        </a>
    </div>
</article>"#,
            slug = escape_html(product.slug.as_str()),
            href = href,
            image = image,
            name = name,
            part_number = escape_html(product.part_number.as_str()),
            stock_class = stock_status_class(product.stock_status),
            stock_label = product.stock_status.label(),
            in_cart_html = in_cart_html,
            button_class = action.button_class(),
            button_label = action.label(),
        )
    }
}
