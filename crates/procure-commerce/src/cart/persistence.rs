//! Durable cart storage.

use chrono::{DateTime, Utc};
use procure_cache::{cache_key, Cache, CacheError, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, LineItem};
use crate::money::Currency;

/// Schema version written into every stored cart record.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Errors from reading or writing the stored cart.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// The record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The record was written by an unknown schema version.
    #[error("Unsupported cart schema version {0}")]
    UnsupportedVersion(u32),

    /// The record decoded but breaks a cart invariant.
    #[error("Invalid cart record: {0}")]
    InvalidRecord(String),
}

/// Whether the in-memory cart is currently backed by durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PersistenceStatus {
    /// The last write succeeded.
    #[default]
    Healthy,
    /// The last write (or the initial read) failed; the cart lives in memory only.
    Degraded { reason: String },
}

impl PersistenceStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PersistenceStatus::Degraded { .. })
    }
}

/// Versioned on-disk shape of a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredCart {
    pub version: u32,
    pub currency: Currency,
    pub items: Vec<LineItem>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RecordHeader {
    version: u32,
}

/// Reads and writes one cart record in a [`Cache`].
#[derive(Debug, Clone)]
pub struct CartRepository {
    cache: Cache,
    key: String,
}

impl CartRepository {
    /// Store the cart under an explicit key.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// Store the cart under `<prefix>:<session>`.
    pub fn for_session(cache: Cache, prefix: &str, session: &SessionId) -> Self {
        Self::new(cache, cache_key!(prefix, session))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the cart, replacing the previous record.
    pub fn save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        let record = StoredCart {
            version: CART_SCHEMA_VERSION,
            currency: cart.currency(),
            items: cart.items().to_vec(),
            saved_at: Utc::now(),
        };
        let bytes = serde_json::to_vec(&record)?;
        self.cache.set_raw(&self.key, &bytes)?;
        Ok(())
    }

    /// Load the saved cart.
    ///
    /// A missing record yields an empty cart in `currency`. A record that
    /// cannot be decoded or validated is logged, deleted and replaced by an
    /// empty cart. Only a failing backend read is returned as an error.
    pub fn load(&self, currency: Currency) -> Result<Cart, PersistenceError> {
        let Some(bytes) = self.cache.get_raw(&self.key)? else {
            return Ok(Cart::new(currency));
        };

        match Self::decode(&bytes) {
            Ok(cart) => Ok(cart),
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "discarding unreadable stored cart");
                if let Err(delete_error) = self.cache.delete(&self.key) {
                    tracing::warn!(key = %self.key, error = %delete_error, "failed to delete unreadable cart");
                }
                Ok(Cart::new(currency))
            }
        }
    }

    /// Delete the stored record.
    pub fn discard(&self) -> Result<(), PersistenceError> {
        self.cache.delete(&self.key)?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Cart, PersistenceError> {
        let header: RecordHeader = serde_json::from_slice(bytes)?;
        if header.version != CART_SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedVersion(header.version));
        }
        let record: StoredCart = serde_json::from_slice(bytes)?;
        Cart::from_items(record.currency, record.items)
            .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))
    }
}
