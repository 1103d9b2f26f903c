//! Read-only access to the cart for view components.

use std::sync::Arc;

use crate::cart::{CartEvent, CartSnapshot, CartStore, Subscription};
use crate::error::CommerceError;
use crate::ids::ProductSlug;

/// Shared handle to a [`CartStore`].
///
/// This is what view components receive. It hands out snapshots and
/// forwards the four mutators unchanged; there is no way to reach the
/// cart itself through it. Cloning is cheap and every clone talks to the
/// same store.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Arc<CartStore>,
}

impl CartHandle {
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.store.snapshot()
    }

    pub fn add_item(
        &self,
        product: &ProductSlug,
        quantity: i64,
    ) -> Result<CartSnapshot, CommerceError> {
        self.store.add_item(product, quantity)
    }

    pub fn remove_item(&self, product: &ProductSlug) -> CartSnapshot {
        self.store.remove_item(product)
    }

    pub fn set_quantity(
        &self,
        product: &ProductSlug,
        quantity: i64,
    ) -> Result<CartSnapshot, CommerceError> {
        self.store.set_quantity(product, quantity)
    }

    pub fn clear(&self) -> CartSnapshot {
        self.store.clear()
    }

    /// Re-render hook: `listener` runs after every committed change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }
}
