//! Site header: brand, navigation and the cart badge.

use std::sync::{Arc, Mutex, MutexGuard};

use procure_commerce::cart::{CartEvent, CartHandle, CartSnapshot, Subscription};

use crate::html::escape_html;
use crate::nav::NAV_LINKS;

const BRAND: &str = "Procure Marine";
const CART_HREF: &str = "/cart";

/// Render the item-count badge; nothing when the cart is empty.
pub fn render_cart_badge(total_items: i64) -> String {
    if total_items <= 0 {
        return String::new();
    }
    format!(
        r#"<span class="cart-badge" aria-label="{total_items} items in cart">{total_items}</span>"#
    )
}

/// Site header bound to the shared cart.
#[derive(Debug, Clone)]
pub struct Header {
    cart: CartHandle,
    current_path: String,
}

impl Header {
    pub fn new(cart: CartHandle, current_path: impl Into<String>) -> Self {
        Self {
            cart,
            current_path: current_path.into(),
        }
    }

    /// Render the full header from the current cart snapshot.
    pub fn render(&self) -> String {
        let total_items = self.cart.snapshot().total_items();
        let badge = render_cart_badge(total_items);

        let nav_html: String = NAV_LINKS
            .iter()
            .map(|link| link.render(&self.current_path))
            .collect::<Vec<_>>()
            .join("\n            ");

        format!(
            r#"<header class="site-header">
    <nav class="site-nav">
        <a href="/" class="brand">
            <span class="brand-logo" aria-hidden="true"></span>
            <h2 class="brand-name">{brand}</h2>
        </a>
        <div class="nav-desktop">
            {nav_html}
            <a href="{cart_href}" class="cart-link">
                <span class="material-symbols-outlined">shopping_cart</span>
                <span class="cart-label">Cart</span>
                {badge}
            </a>
        </div>
        <div class="nav-mobile">
            <a href="{cart_href}" class="cart-link cart-link--mobile">
                <span class="material-symbols-outlined">shopping_cart</span>
                {badge}
            </a>
            <button class="menu-toggle" aria-label="Open menu">
                <span class="material-symbols-outlined">menu</span>
            </button>
        </div>
    </nav>
</header>"#,
            brand = escape_html(BRAND),
            nav_html = nav_html,
            cart_href = CART_HREF,
            badge = badge,
        )
    }
}

/// Cart badge that re-renders itself whenever the cart changes.
///
/// Holds its subscription; dropping the badge stops the updates. Snapshots
/// older than the one already shown are ignored, so the badge never steps
/// back to a stale count.
#[derive(Debug)]
pub struct LiveBadge {
    state: Arc<Mutex<BadgeState>>,
    _subscription: Subscription,
}

#[derive(Debug, Default)]
struct BadgeState {
    /// Revision of the snapshot last rendered.
    revision: Option<u64>,
    total_items: i64,
    html: String,
    renders: u64,
}

impl BadgeState {
    fn apply(&mut self, snapshot: &CartSnapshot) {
        if self.revision.is_some_and(|shown| snapshot.revision <= shown) {
            return;
        }
        self.revision = Some(snapshot.revision);
        self.total_items = snapshot.total_items();
        self.html = render_cart_badge(self.total_items);
        self.renders += 1;
    }
}

impl LiveBadge {
    pub fn new(cart: &CartHandle) -> Self {
        let state = Arc::new(Mutex::new(BadgeState::default()));

        // Subscribe before seeding so no commit falls between the two.
        let sink = Arc::clone(&state);
        let subscription = cart.subscribe(move |event| match event {
            CartEvent::Changed(snapshot) => lock(&sink).apply(snapshot),
            CartEvent::PersistenceFailed { reason } => {
                tracing::debug!(%reason, "cart badge showing unsaved cart");
            }
        });
        lock(&state).apply(&cart.snapshot());

        Self {
            state,
            _subscription: subscription,
        }
    }

    /// Latest rendered badge HTML.
    pub fn html(&self) -> String {
        lock(&self.state).html.clone()
    }

    /// Count shown by the latest render.
    pub fn total_items(&self) -> i64 {
        lock(&self.state).total_items
    }

    /// Number of renders so far, including the initial one.
    pub fn renders(&self) -> u64 {
        lock(&self.state).renders
    }
}

fn lock(state: &Mutex<BadgeState>) -> MutexGuard<'_, BadgeState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
