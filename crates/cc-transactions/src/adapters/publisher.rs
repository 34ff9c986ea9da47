//! Event bus publisher adapter.
//!
//! Producer side of the pipeline: validates submissions and hands them to
//! the bus without waiting for them to be processed.

use std::sync::Arc;

use shared_bus::{BusState, EventBus, EventContext};
use shared_types::{topics, ConnectorEvent, TxEvent};

use crate::domain::{TransactionError, TransactionSubmission};
use crate::COMPONENT;

/// Accepts transaction submissions and publishes them as
/// [`ConnectorEvent::TransactionCreated`].
pub struct TransactionIntake {
    bus: Arc<EventBus<ConnectorEvent>>,
    topic: String,
}

impl TransactionIntake {
    /// Intake publishing on [`topics::TRANSACTION_CREATED`].
    pub fn new(bus: Arc<EventBus<ConnectorEvent>>) -> Self {
        Self::with_topic(bus, topics::TRANSACTION_CREATED)
    }

    pub fn with_topic(bus: Arc<EventBus<ConnectorEvent>>, topic: impl Into<String>) -> Self {
        Self {
            bus,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Validate `submission` and publish it. Returns the new transaction id.
    ///
    /// Returns as soon as the event is handed to the bus; persistence happens
    /// asynchronously.
    ///
    /// # Errors
    /// - `BusClosed`: the bus is closing or closed
    /// - `InvalidGas` / `InvalidAmount`: the submission did not parse
    pub fn submit(
        &self,
        ctx: EventContext,
        submission: TransactionSubmission,
    ) -> Result<String, TransactionError> {
        self.ensure_open()?;

        let tx = submission.into_transaction()?;
        let id = tx.id.clone();

        cc_telemetry::log_tx_event!(
            debug,
            COMPONENT,
            "Transaction accepted",
            id,
            chain = %tx.chain,
            topic = %self.topic
        );
        self.bus
            .publish(ctx, &self.topic, ConnectorEvent::TransactionCreated(tx));
        Ok(id)
    }

    /// Publish a lifecycle event on its own topic.
    ///
    /// # Errors
    /// - `BusClosed`: the bus is closing or closed
    pub fn publish_lifecycle(
        &self,
        ctx: EventContext,
        event: TxEvent,
    ) -> Result<(), TransactionError> {
        self.ensure_open()?;
        let topic = event.topic();
        self.bus.publish(ctx, topic, ConnectorEvent::Lifecycle(event));
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), TransactionError> {
        if self.bus.state() == BusState::Running {
            Ok(())
        } else {
            Err(TransactionError::BusClosed)
        }
    }
}
