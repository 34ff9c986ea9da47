//! Transaction error types.

use thiserror::Error;

/// Errors raised by the transactions subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The transaction cannot be stored (e.g. it has no id).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// No transaction with this id.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The submitted gas limit is not an unsigned 64-bit integer.
    #[error("invalid gas value: {0:?}")]
    InvalidGas(String),

    /// A submitted amount is not a decimal integer that fits in 256 bits.
    #[error("invalid {field} value: {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    /// The request context was cancelled or timed out.
    #[error("operation cancelled")]
    Cancelled,

    /// The event bus no longer accepts submissions.
    #[error("event bus is closed")]
    BusClosed,

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(String),
}
