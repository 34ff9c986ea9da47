//! # Error Types
//!
//! Errors raised while building shared domain values.

use thiserror::Error;

/// A status string did not name a known transaction status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown transaction status: {0}")]
pub struct ParseStatusError(pub String);
