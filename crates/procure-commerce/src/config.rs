//! Cart store configuration.

use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// Settings for a [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartStoreConfig {
    /// Prefix of the storage key; the session id is appended.
    pub key_prefix: String,
    /// Currency of new carts.
    pub currency: Currency,
}

impl Default for CartStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: "cart".to_string(),
            currency: Currency::USD,
        }
    }
}
