//! Constructed services shared by the runtime and its wiring.

use std::sync::Arc;

use cc_transactions::{
    InMemoryTransactionRepository, TracingFailureObserver, TransactionApi, TransactionIntake,
    TransactionService,
};
use shared_bus::EventBus;
use shared_types::ConnectorEvent;

use super::config::RuntimeConfig;

/// Every long-lived component of the connector.
pub struct ServiceContainer {
    pub bus: Arc<EventBus<ConnectorEvent>>,
    pub repository: Arc<InMemoryTransactionRepository>,
    pub service: Arc<dyn TransactionApi>,
    pub intake: Arc<TransactionIntake>,
}

impl ServiceContainer {
    /// Build all services. Must be called inside a Tokio runtime.
    pub fn new(config: &RuntimeConfig) -> Self {
        let bus = Arc::new(
            EventBus::<ConnectorEvent>::builder()
                .config(config.bus.clone())
                .failure_observer(Arc::new(TracingFailureObserver))
                .build(),
        );
        let repository = Arc::new(InMemoryTransactionRepository::new());
        let service: Arc<dyn TransactionApi> =
            Arc::new(TransactionService::new(repository.clone()));
        let intake = Arc::new(TransactionIntake::with_topic(
            Arc::clone(&bus),
            config.transaction_topic.clone(),
        ));

        Self {
            bus,
            repository,
            service,
            intake,
        }
    }
}
