//! Commerce error types.

use thiserror::Error;

use crate::cart::PersistenceError;

/// Errors that can occur in cart and catalog operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Durable storage failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Coarse classification of a [`CommerceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced product does not exist.
    NotFound,
    /// Input was rejected before any state changed.
    Validation,
    /// Durable storage failed; in-memory state is unaffected.
    Persistence,
}

impl CommerceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::ProductNotFound(_) => ErrorKind::NotFound,
            CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(..)
            | CommerceError::ValidationError(_)
            | CommerceError::SerializationError(_) => ErrorKind::Validation,
            CommerceError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CommerceError::ProductNotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CommerceError::InvalidQuantity(-1).kind(), ErrorKind::Validation);
        assert_eq!(
            CommerceError::QuantityExceedsLimit(10_000, 9999).kind(),
            ErrorKind::Validation
        );
        let persistence: CommerceError = PersistenceError::UnsupportedVersion(9).into();
        assert_eq!(persistence.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommerceError::ProductNotFound("bilge-pump".into()).to_string(),
            "Product not found: bilge-pump"
        );
        assert_eq!(
            CommerceError::QuantityExceedsLimit(10_000, 9999).to_string(),
            "Quantity 10000 exceeds maximum allowed (9999)"
        );
    }
}
