//! Ports layer for the transactions subsystem.
//!
//! - Inbound (Driving) ports: API exposed to adapters
//! - Outbound (Driven) ports: persistence

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
