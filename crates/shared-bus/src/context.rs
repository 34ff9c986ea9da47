//! # Event Context
//!
//! Request-scoped data passed through the bus to every handler untouched.
//! The bus never inspects it and never enforces its deadline; handlers
//! decide whether to honour cancellation.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

/// Context delivered to handlers alongside the payload.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Correlates all handler invocations of one publish call.
    correlation_id: Uuid,

    /// Optional point in time after which the work is considered cancelled.
    deadline: Option<Instant>,

    /// Optional explicit cancellation signal.
    cancel: Option<watch::Receiver<bool>>,
}

impl Default for EventContext {
    fn default() -> Self {
        Self::background()
    }
}

impl EventContext {
    /// A context with a fresh correlation id, no deadline and no cancellation.
    #[must_use]
    pub fn background() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            deadline: None,
            cancel: None,
        }
    }

    /// Replace the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Set a deadline `timeout` from now. An earlier existing deadline wins.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attach a cancellation signal, replacing any previous one.
    ///
    /// Returns the handle used to trigger it.
    #[must_use]
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.cancel = Some(receiver);
        (self, CancelHandle { sender })
    }

    /// Correlation id of the originating publish call.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context was cancelled or its deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        let signalled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        signalled || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context.
    pub async fn cancelled(&self) {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        let signal = async {
            let Some(mut rx) = self.cancel.clone() else {
                return std::future::pending().await;
            };
            loop {
                let cancelled = *rx.borrow_and_update();
                if cancelled {
                    return;
                }
                // Handle dropped without cancelling: the signal can never fire.
                if rx.changed().await.is_err() {
                    return std::future::pending().await;
                }
            }
        };

        tokio::select! {
            _ = deadline => {}
            _ = signal => {}
        }
    }
}

/// Triggers cancellation of an [`EventContext`] and all of its clones.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the associated context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}
