//! # Service Container
//!
//! Builds the bus and the transaction services and holds them for the
//! lifetime of the runtime.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig};
pub use services::ServiceContainer;
