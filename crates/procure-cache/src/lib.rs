//! Type-safe Key-Value storage layer for the Procure Marine storefront.
//!
//! Provides a small set of byte-oriented backends behind the [`KeyValueStore`]
//! trait and a [`Cache`] wrapper that adds automatic JSON serialization.
//!
//! - [`MemoryStore`] - process-local map, optionally size-limited
//! - [`FileStore`] - one file per key under a directory
//! - `SpinStore` - Spin's Key-Value Store (wasm32 only)
//!
//! # Example
//!
//! ```rust
//! use procure_cache::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Badge {
//!     count: u32,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! cache.set("badge:session", &Badge { count: 3 }).unwrap();
//! let badge: Option<Badge> = cache.get("badge:session").unwrap();
//! assert_eq!(badge, Some(Badge { count: 3 }));
//!
//! cache.delete("badge:session").unwrap();
//! ```

mod error;
mod kv;
mod session;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use session::SessionId;
#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore, SessionId};
}
