//! # Connector Telemetry
//!
//! Structured logging for the chain connector.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cc_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     tracing::info!("connector starting");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `chain-connector` | Service name attached to logs |
//! | `CC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `CC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CC_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `CC_NETWORK` | `testnet` | Network identifier |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Convenience macro for creating a span with component context.
///
/// # Example
///
/// ```rust,ignore
/// use cc_telemetry::component_span;
///
/// let _span = component_span!("create_transaction", component = "transactions", tx_id = %id);
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
