//! Shopping cart module.
//!
//! Contains the cart entity, derived totals, durable storage, change
//! events, and the store and handle that own and expose the cart.

mod cart;
mod events;
mod facade;
mod persistence;
mod pricing;
mod store;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use events::{CartEvent, Listener, Subscription};
pub use facade::CartHandle;
pub use persistence::{
    CartRepository, PersistenceError, PersistenceStatus, StoredCart, CART_SCHEMA_VERSION,
};
pub use pricing::CartTotals;
pub use store::{CartSnapshot, CartStore};
