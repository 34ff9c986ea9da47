//! # Event Wiring
//!
//! Connects bus topics to their handlers and keeps the subscriptions so
//! they can be released on shutdown.

use std::sync::Arc;

use cc_transactions::TransactionCreatedHandler;
use parking_lot::Mutex;
use shared_bus::{Subscription, SubscriptionId};
use tracing::info;

use crate::container::ServiceContainer;
use crate::error::RuntimeError;

/// Owns the created-transaction subscription.
#[derive(Default)]
pub struct TransactionWiring {
    subscription: Mutex<Option<Subscription>>,
}

impl TransactionWiring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the created-transaction handler on `topic`.
    ///
    /// # Errors
    /// - `AlreadyStarted`: a subscription is already held
    pub fn connect(
        &self,
        services: &ServiceContainer,
        topic: &str,
    ) -> Result<SubscriptionId, RuntimeError> {
        let mut slot = self.subscription.lock();
        if slot.is_some() {
            return Err(RuntimeError::AlreadyStarted);
        }

        let handler = TransactionCreatedHandler::new(Arc::clone(&services.service));
        let subscription = services.bus.subscribe(topic, handler);
        let id = subscription.id();
        info!(topic, subscription_id = id, "Subscribed created-transaction handler");

        *slot = Some(subscription);
        Ok(id)
    }

    /// Release the subscription. Returns `false` if none was held.
    pub fn disconnect(&self) -> bool {
        let Some(subscription) = self.subscription.lock().take() else {
            return false;
        };
        let removed = subscription.unsubscribe();
        info!(
            topic = subscription.topic(),
            subscription_id = subscription.id(),
            "Unsubscribed created-transaction handler"
        );
        removed
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.lock().is_some()
    }
}
