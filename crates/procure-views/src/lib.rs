//! Header and product card views for the Procure Marine storefront.
//!
//! Views are pure consumers of a [`CartHandle`](procure_commerce::cart::CartHandle):
//! they render HTML from cart snapshots and forward user actions to the
//! handle, nothing more.

mod header;
mod html;
mod nav;
mod product_card;

pub use header::{render_cart_badge, Header, LiveBadge};
pub use nav::{NavLink, NAV_LINKS};
pub use product_card::{stock_status_class, CardAction, ProductCard};
