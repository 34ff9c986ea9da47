//! # Connector Runtime Library
//!
//! Wires the event bus to the transaction pipeline and owns the startup and
//! shutdown order. The `main.rs` binary drives it from process signals.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (environment)
//! 2. Build the bus, repository, service and intake
//! 3. Subscribe the created-transaction handler
//! 4. Accept submissions through [`TransactionIntake`]
//!
//! ## Shutdown Sequence
//!
//! 1. Unsubscribe the handler
//! 2. Close the bus (stops workers, discards queued jobs)

pub mod container;
pub mod error;
pub mod wiring;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cc_transactions::{InMemoryTransactionRepository, TransactionApi, TransactionIntake};
use shared_bus::{BusState, EventBus};
use shared_types::ConnectorEvent;
use tracing::{error, info};

pub use container::{ConfigError, RuntimeConfig, ServiceContainer};
pub use error::RuntimeError;
pub use wiring::TransactionWiring;

/// The connector runtime orchestrating the bus and its subscribers.
pub struct ConnectorRuntime {
    config: RuntimeConfig,
    services: ServiceContainer,
    wiring: TransactionWiring,
    shut_down: AtomicBool,
}

impl ConnectorRuntime {
    /// Build every service described by `config`. Must be called inside a
    /// Tokio runtime.
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        info!(
            workers = config.bus.worker_count,
            queue_capacity = config.bus.queue_capacity,
            topic = %config.transaction_topic,
            "Creating connector runtime"
        );

        let services = ServiceContainer::new(&config);
        Ok(Self {
            config,
            services,
            wiring: TransactionWiring::new(),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Subscribe handlers. Fails if already started or shut down.
    pub fn start(&self) -> Result<(), RuntimeError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(RuntimeError::ShutDown);
        }
        self.wiring
            .connect(&self.services, &self.config.transaction_topic)?;
        info!("Connector runtime started");
        Ok(())
    }

    /// Unsubscribe handlers, then close the bus.
    ///
    /// Close failures are logged, not returned.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.shut_down.store(true, Ordering::Release);

        self.wiring.disconnect();

        if let Err(e) = self.services.bus.close().await {
            error!(error = %e, "Error closing event bus");
            return;
        }
        info!("Shutdown complete");
    }

    pub fn is_running(&self) -> bool {
        self.wiring.is_connected() && self.services.bus.state() == BusState::Running
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> Arc<EventBus<ConnectorEvent>> {
        Arc::clone(&self.services.bus)
    }

    pub fn intake(&self) -> Arc<TransactionIntake> {
        Arc::clone(&self.services.intake)
    }

    pub fn repository(&self) -> Arc<InMemoryTransactionRepository> {
        Arc::clone(&self.services.repository)
    }

    pub fn service(&self) -> Arc<dyn TransactionApi> {
        Arc::clone(&self.services.service)
    }
}
