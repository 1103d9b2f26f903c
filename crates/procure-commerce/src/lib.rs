//! Cart state, catalog and pricing types for the Procure Marine storefront.
//!
//! - **Catalog**: products, stock status, fixed or on-request pricing
//! - **Cart**: line items, derived totals, durable storage
//! - **Store**: the single owner of the cart, with change notifications
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use procure_cache::{Cache, MemoryStore, SessionId};
//! use procure_commerce::prelude::*;
//!
//! let catalog = InMemoryCatalog::new(vec![Product::new(
//!     "bilge-pump-500",
//!     "BP-500",
//!     "Bilge Pump 500 GPH",
//!     Price::fixed(Money::new(4999, Currency::USD)),
//! )])
//! .unwrap();
//!
//! let store = CartStore::open_session(
//!     Arc::new(catalog),
//!     Cache::new(MemoryStore::new()),
//!     &SessionId::generate(),
//!     &CartStoreConfig::default(),
//! );
//! let cart = CartHandle::new(store);
//!
//! let _badge = cart.subscribe(|event| {
//!     if let CartEvent::Changed(snapshot) = event {
//!         println!("cart now holds {} items", snapshot.total_items());
//!     }
//! });
//!
//! let snapshot = cart.add_item(&ProductSlug::new("bilge-pump-500"), 2).unwrap();
//! assert_eq!(snapshot.total_items(), 2);
//! assert_eq!(snapshot.totals.subtotal.display(), "$99.98");
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use config::CartStoreConfig;
pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CartStoreConfig;
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{InMemoryCatalog, Price, Product, ProductCatalog, StockStatus};

    // Cart
    pub use crate::cart::{
        Cart, CartEvent, CartHandle, CartRepository, CartSnapshot, CartStore, CartTotals,
        LineItem, PersistenceStatus, Subscription, MAX_QUANTITY_PER_ITEM,
    };
}
