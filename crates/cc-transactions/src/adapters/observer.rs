//! Reports handler failures through `tracing`.

use shared_bus::{FailureObserver, HandlerError, HandlerFailure};
use tracing::{error, warn};

/// [`FailureObserver`] that logs every failed handler invocation.
///
/// Cancellations are logged at `warn`, everything else at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureObserver;

impl FailureObserver for TracingFailureObserver {
    fn on_failure(&self, failure: &HandlerFailure) {
        match &failure.error {
            HandlerError::Cancelled => warn!(
                topic = %failure.topic,
                subscription_id = failure.subscription_id,
                path = ?failure.path,
                "Handler cancelled"
            ),
            err => error!(
                topic = %failure.topic,
                subscription_id = failure.subscription_id,
                path = ?failure.path,
                error = %err,
                "Handler failed"
            ),
        }
    }
}
