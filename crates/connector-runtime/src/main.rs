//! # Chain Connector
//!
//! Entry point: loads configuration, initializes logging, runs the
//! connector until Ctrl+C, then shuts it down in order.

use anyhow::{Context, Result};
use tracing::info;

use connector_runtime::{ConnectorRuntime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = RuntimeConfig::from_env();

    // Initialize logging
    cc_telemetry::init_logging(&config.telemetry).context("Failed to initialize logging")?;

    // Create and start the connector runtime
    let runtime = ConnectorRuntime::new(config).context("Failed to create connector runtime")?;
    runtime.start().context("Failed to start connector runtime")?;

    // Keep the connector running
    info!("Connector is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
