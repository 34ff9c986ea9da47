//! # Shared Types Crate
//!
//! Domain entities and bus payloads shared across the connector crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Transaction, receipt and event types live here.
//! - **Opaque to the bus**: `shared-bus` never inspects these values; producers
//!   and consumers of a topic agree on the [`ConnectorEvent`] variant.

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::*;
