//! # Event Handlers
//!
//! A handler is a single-method capability invoked with the publish context
//! and a payload. Closures, function pointers and structs are
//! interchangeable: any `Fn(EventContext, P) -> impl Future` is a handler.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::context::EventContext;
use crate::dispatch::DispatchPath;
use crate::subscriber::SubscriptionId;

/// Result returned by a handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure reported by a handler.
///
/// The bus discards these; they only reach a [`FailureObserver`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The payload was not the type this handler expects.
    #[error("invalid payload: expected {expected}")]
    InvalidPayload { expected: &'static str },

    /// The handler stopped because its context was cancelled.
    #[error("handler cancelled")]
    Cancelled,

    /// The handler's own processing failed.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler panicked; the panic was contained by the dispatcher.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Wrap any displayable error as [`HandlerError::Failed`].
    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Receives events published on a topic.
#[async_trait]
pub trait EventHandler<P>: Send + Sync + 'static {
    /// Process one event.
    async fn handle(&self, ctx: EventContext, payload: P) -> HandlerResult;
}

#[async_trait]
impl<P, F, Fut> EventHandler<P> for F
where
    P: Send + 'static,
    F: Fn(EventContext, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: EventContext, payload: P) -> HandlerResult {
        (self)(ctx, payload).await
    }
}

/// Details of a failed handler invocation.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Topic the event was published on.
    pub topic: Arc<str>,
    /// Subscription whose handler failed.
    pub subscription_id: SubscriptionId,
    /// Which execution path ran the handler.
    pub path: DispatchPath,
    /// The failure itself.
    pub error: HandlerError,
}

/// Optional collaborator notified whenever a handler fails.
///
/// Called on the task that ran the handler; keep it cheap.
pub trait FailureObserver: Send + Sync + 'static {
    fn on_failure(&self, failure: &HandlerFailure);
}
