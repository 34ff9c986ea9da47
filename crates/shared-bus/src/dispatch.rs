//! # Dispatch
//!
//! Jobs, the worker pool that drains the bounded dispatch queue, and the
//! fallback path used when the queue is full.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::context::EventContext;
use crate::handler::{EventHandler, FailureObserver, HandlerError, HandlerFailure};
use crate::subscriber::SubscriptionId;

/// Execution path that ran a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPath {
    /// Dequeued by a worker of the pool.
    Queued,
    /// Spawned on a detached task because the queue was full or closed.
    Fallback,
}

/// One handler invocation, consumed exactly once.
pub(crate) struct Job<P> {
    pub(crate) topic: Arc<str>,
    pub(crate) subscription_id: SubscriptionId,
    pub(crate) handler: Arc<dyn EventHandler<P>>,
    pub(crate) payload: P,
    pub(crate) ctx: EventContext,
}

impl<P: Send + 'static> Job<P> {
    /// Run the handler. Failures and panics go to the monitor, never upward.
    pub(crate) async fn execute(self, path: DispatchPath, monitor: &DispatchMonitor) {
        let Job {
            topic,
            subscription_id,
            handler,
            payload,
            ctx,
        } = self;

        let outcome = AssertUnwindSafe(handler.handle(ctx, payload))
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(error)) => error,
            Err(panic) => HandlerError::Panicked(panic_message(panic.as_ref())),
        };

        monitor.record_failure(HandlerFailure {
            topic,
            subscription_id,
            path,
            error,
        });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        return (*msg).to_owned();
    }
    if let Some(msg) = panic.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_owned()
}

/// Counters and the failure hook shared by workers and fallback tasks.
#[derive(Default)]
pub(crate) struct DispatchMonitor {
    pub(crate) published: AtomicU64,
    pub(crate) queued: AtomicU64,
    pub(crate) fallback: AtomicU64,
    pub(crate) failures: AtomicU64,
    fallback_in_flight: AtomicUsize,
    fallback_idle: Notify,
    observer: Option<Arc<dyn FailureObserver>>,
}

impl DispatchMonitor {
    pub(crate) fn new(observer: Option<Arc<dyn FailureObserver>>) -> Self {
        Self {
            observer,
            ..Self::default()
        }
    }

    fn record_failure(&self, failure: HandlerFailure) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if let Some(observer) = &self.observer {
            observer.on_failure(&failure);
        }
    }

    pub(crate) fn fallback_in_flight(&self) -> usize {
        self.fallback_in_flight.load(Ordering::Acquire)
    }

    /// Wait until no fallback task is running.
    pub(crate) async fn wait_fallback_idle(&self) {
        loop {
            let notified = self.fallback_idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.fallback_in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Keeps the in-flight fallback count accurate even if the task is aborted.
struct FallbackGuard {
    monitor: Arc<DispatchMonitor>,
}

impl FallbackGuard {
    fn new(monitor: Arc<DispatchMonitor>) -> Self {
        monitor.fallback_in_flight.fetch_add(1, Ordering::AcqRel);
        Self { monitor }
    }
}

impl Drop for FallbackGuard {
    fn drop(&mut self) {
        if self.monitor.fallback_in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.monitor.fallback_idle.notify_waiters();
        }
    }
}

/// Run `job` right away on its own task, outside the worker pool.
pub(crate) fn spawn_fallback<P: Send + 'static>(
    runtime: &Handle,
    job: Job<P>,
    monitor: &Arc<DispatchMonitor>,
) {
    monitor.fallback.fetch_add(1, Ordering::Relaxed);
    let guard = FallbackGuard::new(Arc::clone(monitor));
    runtime.spawn(async move {
        let monitor = Arc::clone(&guard.monitor);
        job.execute(DispatchPath::Fallback, &monitor).await;
        drop(guard);
    });
}

/// Receiving end of the dispatch queue, shared by every worker.
pub(crate) type SharedQueue<P> = Arc<Mutex<mpsc::Receiver<Job<P>>>>;

/// Start `count` workers draining `queue` until `shutdown` flips to `true`.
pub(crate) fn spawn_workers<P: Send + 'static>(
    runtime: &Handle,
    count: usize,
    queue: &SharedQueue<P>,
    shutdown: &watch::Receiver<bool>,
    monitor: &Arc<DispatchMonitor>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|worker_id| {
            let worker = Worker {
                worker_id,
                queue: Arc::clone(queue),
                shutdown: shutdown.clone(),
                monitor: Arc::clone(monitor),
            };
            runtime.spawn(worker.run())
        })
        .collect()
}

struct Worker<P> {
    worker_id: usize,
    queue: SharedQueue<P>,
    shutdown: watch::Receiver<bool>,
    monitor: Arc<DispatchMonitor>,
}

impl<P: Send + 'static> Worker<P> {
    async fn run(mut self) {
        debug!(worker_id = self.worker_id, "Dispatch worker started");

        loop {
            let stopping = *self.shutdown.borrow();
            if stopping {
                break;
            }

            // Shutdown wins over pending jobs: queued work is not drained.
            let next = tokio::select! {
                biased;
                _ = self.shutdown.changed() => None,
                job = next_job(&self.queue) => job,
            };

            let Some(job) = next else {
                break;
            };
            job.execute(DispatchPath::Queued, &self.monitor).await;
        }

        debug!(worker_id = self.worker_id, "Dispatch worker stopped");
    }
}

async fn next_job<P>(queue: &Mutex<mpsc::Receiver<Job<P>>>) -> Option<Job<P>> {
    queue.lock().await.recv().await
}
