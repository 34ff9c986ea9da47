//! Adapters layer for the transactions subsystem.

pub mod memory;
pub mod observer;
pub mod publisher;
pub mod subscriber;

pub use memory::*;
pub use observer::*;
pub use publisher::*;
pub use subscriber::*;
