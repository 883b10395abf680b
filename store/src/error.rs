//! Error types for coingram storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of record was missing.
        entity: &'static str,
        /// The key that was looked up.
        id: String,
    },

    /// Insufficient coins for a debit.
    #[error("insufficient funds: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Current balance in coins.
        balance: i64,
        /// Required amount in coins.
        required: i64,
    },

    /// Duplicate purchase event (idempotency guard hit).
    #[error("duplicate event: {event_id}")]
    DuplicateEvent {
        /// The event id that was duplicated.
        event_id: String,
    },
}
