//! Errors surfaced by the bus itself.
//!
//! Handler failures are a separate type ([`crate::HandlerError`]) because
//! they never reach the publisher.

use thiserror::Error;

/// Errors from bus lifecycle operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// `close()` was already called on this bus.
    #[error("bus already closed")]
    AlreadyClosed,
}
