//! The cart store: sole owner and mutator of cart state.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use procure_cache::{Cache, SessionId};
use serde::{Deserialize, Serialize};

use crate::cart::cart::validate_quantity;
use crate::cart::events::ListenerRegistry;
use crate::cart::{
    Cart, CartEvent, CartRepository, CartTotals, LineItem, PersistenceStatus, Subscription,
};
use crate::catalog::{Product, ProductCatalog};
use crate::config::CartStoreConfig;
use crate::error::CommerceError;
use crate::ids::ProductSlug;
use crate::money::Currency;

/// Immutable, point-in-time view of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Totals computed from `items` when the snapshot was taken.
    pub totals: CartTotals,
    /// Cart currency.
    pub currency: Currency,
    /// Whether the cart is currently durable.
    pub persistence: PersistenceStatus,
    /// Incremented by every committed change.
    pub revision: u64,
}

impl CartSnapshot {
    /// Sum of all quantities; what the header badge shows.
    pub fn total_items(&self) -> i64 {
        self.totals.total_items
    }

    /// Quantity of one product, 0 when absent.
    pub fn quantity_of(&self, product: &ProductSlug) -> i64 {
        self.items
            .iter()
            .find(|i| &i.product == product)
            .map_or(0, |i| i.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// How a commit reaches storage.
#[derive(Debug, Clone, Copy)]
enum WriteMode {
    /// Write the new cart over the record.
    Save,
    /// Delete the record; the next session starts empty.
    Discard,
}

struct StoreState {
    cart: Cart,
    revision: u64,
    persistence: PersistenceStatus,
}

impl StoreState {
    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.cart.items().to_vec(),
            totals: self.cart.totals(),
            currency: self.cart.currency(),
            persistence: self.persistence.clone(),
            revision: self.revision,
        }
    }
}

/// Owns the cart, writes it to storage and notifies subscribers.
///
/// Every mutation validates its input, applies the change to a copy of the
/// cart, commits the copy, writes it to storage and builds the resulting
/// snapshot while holding the state lock, and queues its events there too.
/// Subscribers are notified after the lock is released, in commit order.
/// A failed write never rolls back the commit: the store switches to
/// [`PersistenceStatus::Degraded`] and emits [`CartEvent::PersistenceFailed`].
pub struct CartStore {
    catalog: Arc<dyn ProductCatalog>,
    repository: CartRepository,
    state: Mutex<StoreState>,
    listeners: ListenerRegistry,
}

impl CartStore {
    /// Open a store, rehydrating the cart from `repository`.
    pub fn open(
        catalog: Arc<dyn ProductCatalog>,
        repository: CartRepository,
        config: &CartStoreConfig,
    ) -> Self {
        let (cart, persistence) = match repository.load(config.currency) {
            Ok(cart) => (cart, PersistenceStatus::Healthy),
            Err(error) => {
                tracing::error!(key = repository.key(), %error, "failed to read stored cart, starting empty");
                (
                    Cart::new(config.currency),
                    PersistenceStatus::Degraded {
                        reason: error.to_string(),
                    },
                )
            }
        };

        tracing::debug!(
            key = repository.key(),
            items = cart.unique_item_count(),
            total_items = cart.total_items(),
            "cart store opened"
        );

        Self {
            catalog,
            repository,
            state: Mutex::new(StoreState {
                cart,
                revision: 0,
                persistence,
            }),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Open a store whose record is keyed by the session.
    pub fn open_session(
        catalog: Arc<dyn ProductCatalog>,
        cache: Cache,
        session: &SessionId,
        config: &CartStoreConfig,
    ) -> Self {
        let repository = CartRepository::for_session(cache, &config.key_prefix, session);
        Self::open(catalog, repository, config)
    }

    /// Current cart state and fresh totals.
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot()
    }

    /// Add `quantity` of a product, growing its line if already present.
    ///
    /// The resulting line quantity is capped at
    /// [`MAX_QUANTITY_PER_ITEM`](crate::cart::MAX_QUANTITY_PER_ITEM).
    pub fn add_item(
        &self,
        product: &ProductSlug,
        quantity: i64,
    ) -> Result<CartSnapshot, CommerceError> {
        validate_quantity(quantity, 1)?;
        let product = self.lookup(product)?;
        self.mutate("add_item", |cart| {
            let before = cart.item(&product.slug).map(|i| i.quantity);
            let after = cart.add(LineItem::from_product(&product, quantity))?;
            Ok(before != Some(after))
        })
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    pub fn remove_item(&self, product: &ProductSlug) -> CartSnapshot {
        self.commit_infallible("remove_item", WriteMode::Save, |cart| cart.remove(product))
    }

    /// Set a product's quantity exactly.
    ///
    /// 0 removes the line; a product not yet in the cart is added.
    pub fn set_quantity(
        &self,
        product: &ProductSlug,
        quantity: i64,
    ) -> Result<CartSnapshot, CommerceError> {
        validate_quantity(quantity, 0)?;
        if quantity == 0 {
            return Ok(self.remove_item(product));
        }

        let product = self.lookup(product)?;
        self.mutate("set_quantity", |cart| {
            if cart.item(&product.slug).is_some() {
                cart.update_quantity(&product.slug, quantity)
            } else {
                cart.add(LineItem::from_product(&product, quantity))?;
                Ok(true)
            }
        })
    }

    /// Empty the cart.
    pub fn clear(&self) -> CartSnapshot {
        self.commit_infallible("clear", WriteMode::Save, Cart::clear)
    }

    /// Empty the cart after a completed checkout and delete its stored record.
    pub fn complete_checkout(&self) -> CartSnapshot {
        tracing::info!(key = self.repository.key(), "checkout completed, clearing cart");
        self.commit_infallible("complete_checkout", WriteMode::Discard, Cart::clear)
    }

    /// Register a listener for cart events.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(Arc::new(listener))
    }

    fn lookup(&self, product: &ProductSlug) -> Result<Product, CommerceError> {
        self.catalog
            .product(product)
            .ok_or_else(|| CommerceError::ProductNotFound(product.to_string()))
    }

    fn commit_infallible<F>(
        &self,
        operation: &'static str,
        mode: WriteMode,
        apply: F,
    ) -> CartSnapshot
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let snapshot = {
            let mut state = self.lock();
            let mut next = state.cart.clone();
            if apply(&mut next) {
                self.commit(&mut state, next, operation, mode)
            } else {
                state.snapshot()
            }
        };
        self.listeners.deliver();
        snapshot
    }

    fn mutate<F>(&self, operation: &'static str, apply: F) -> Result<CartSnapshot, CommerceError>
    where
        F: FnOnce(&mut Cart) -> Result<bool, CommerceError>,
    {
        let snapshot = {
            let mut state = self.lock();
            let mut next = state.cart.clone();
            if !apply(&mut next)? {
                return Ok(state.snapshot());
            }
            self.commit(&mut state, next, operation, WriteMode::Save)
        };
        self.listeners.deliver();
        Ok(snapshot)
    }

    /// Install `next` as the current cart, write it through and queue its
    /// events. Runs under the state lock so events queue in commit order.
    fn commit(
        &self,
        state: &mut StoreState,
        next: Cart,
        operation: &'static str,
        mode: WriteMode,
    ) -> CartSnapshot {
        state.cart = next;
        state.revision += 1;

        let written = match mode {
            WriteMode::Save => self.repository.save(&state.cart),
            WriteMode::Discard => self.repository.discard(),
        };
        let failure = match written {
            Ok(()) => {
                if state.persistence.is_degraded() {
                    tracing::info!(key = self.repository.key(), "cart persistence recovered");
                }
                state.persistence = PersistenceStatus::Healthy;
                None
            }
            Err(error) => {
                tracing::error!(key = self.repository.key(), operation, %error, "failed to persist cart");
                let reason = error.to_string();
                state.persistence = PersistenceStatus::Degraded {
                    reason: reason.clone(),
                };
                Some(reason)
            }
        };

        let snapshot = state.snapshot();
        tracing::debug!(
            operation,
            revision = snapshot.revision,
            total_items = snapshot.total_items(),
            "cart updated"
        );

        let mut events = vec![CartEvent::Changed(snapshot.clone())];
        if let Some(reason) = failure {
            events.push(CartEvent::PersistenceFailed { reason });
        }
        self.listeners.enqueue(events);
        snapshot
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.repository.key())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
