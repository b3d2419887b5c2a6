//! Unified error types for the storefront engine.
//!
//! Validation and persistence failures have their own small enums so callers
//! (the UI layer) can match on them directly; both convert into the crate-wide
//! [`Error`] with `?`.

use thiserror::Error;

/// Reasons a checkout form is rejected before an order is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name or delivery address is empty
    #[error("Please fill in your name and delivery address")]
    MissingDeliveryInfo,

    /// A field required by the selected payment method is empty
    #[error("Please complete the payment details for the selected method")]
    IncompletePaymentDetails,

    /// The payment method label did not match any supported method
    #[error("Unknown payment method")]
    UnknownPaymentMethod,
}

/// Failures while reading or writing the order history blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The order history could not be serialized
    #[error("Failed to encode order history: {message}")]
    EncodeFailed {
        /// Serializer error text
        message: String,
    },

    /// The stored order history could not be deserialized
    #[error("Failed to decode order history: {message}")]
    DecodeFailed {
        /// Deserializer error text
        message: String,
    },
}

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing, unreadable, or invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Underlying `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A price or rate that is negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// Checkout form rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Order history could not be encoded or decoded
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
