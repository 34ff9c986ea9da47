//! Event bus subscriber adapter.
//!
//! Forwards `transaction.created` events into the [`TransactionApi`].

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::{EventContext, EventHandler, HandlerError, HandlerResult};
use shared_types::ConnectorEvent;
use tracing::debug;

use crate::domain::TransactionError;
use crate::ports::TransactionApi;

/// Handler for [`shared_types::topics::TRANSACTION_CREATED`].
///
/// Only accepts [`ConnectorEvent::TransactionCreated`]; every other variant
/// is rejected as an invalid payload.
pub struct TransactionCreatedHandler {
    api: Arc<dyn TransactionApi>,
}

impl TransactionCreatedHandler {
    pub fn new(api: Arc<dyn TransactionApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EventHandler<ConnectorEvent> for TransactionCreatedHandler {
    async fn handle(&self, ctx: EventContext, payload: ConnectorEvent) -> HandlerResult {
        let tx = match payload {
            ConnectorEvent::TransactionCreated(tx) => tx,
            other => {
                debug!(kind = other.kind(), "Rejecting unexpected payload");
                return Err(HandlerError::InvalidPayload {
                    expected: "TransactionCreated",
                });
            }
        };

        match self.api.create_transaction(&ctx, tx).await {
            Ok(_) => Ok(()),
            Err(TransactionError::Cancelled) => Err(HandlerError::Cancelled),
            Err(err) => Err(HandlerError::failed(err)),
        }
    }
}
