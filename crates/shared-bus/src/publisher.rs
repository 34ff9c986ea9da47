//! # Event Bus
//!
//! Public surface of the bus: `subscribe`, `publish`, `close`.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::BusConfig;
use crate::context::EventContext;
use crate::dispatch::{spawn_fallback, spawn_workers, DispatchMonitor, Job, SharedQueue};
use crate::error::BusError;
use crate::handler::{EventHandler, FailureObserver, HandlerResult};
use crate::subscriber::{Subscription, SubscriptionRegistry, TopicRemoval};

/// Lifecycle state of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    /// Accepting work, workers running.
    Running,
    /// `close()` in progress; workers are being stopped.
    Closing,
    /// Terminal. Further `close()` calls fail.
    Closed,
}

impl BusState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Running => 0,
            Self::Closing => 1,
            Self::Closed => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Running,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Moves the bus to [`BusState::Closed`] when `close()` finishes or its
/// future is dropped part-way.
struct ClosedOnDrop<'a>(&'a AtomicU8);

impl Drop for ClosedOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(BusState::Closed.as_u8(), Ordering::Release);
    }
}

/// Point-in-time dispatch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    /// `publish` calls, including those to topics without subscribers.
    pub published: u64,
    /// Jobs accepted by the dispatch queue.
    pub queued: u64,
    /// Jobs routed to a fallback task.
    pub fallback: u64,
    /// Handler invocations that returned an error or panicked.
    pub handler_failures: u64,
    /// Fallback tasks currently running.
    pub fallback_in_flight: usize,
}

/// In-process publish/subscribe bus with a bounded worker pool.
///
/// The payload type `P` is opaque to the bus; producers and consumers of a
/// topic agree on it out of band (typically a tagged enum).
///
/// Must be created from within a Tokio runtime. Afterwards `publish` and
/// `subscribe` may be called from any thread.
pub struct EventBus<P> {
    registry: Arc<SubscriptionRegistry<P>>,
    sender: mpsc::Sender<Job<P>>,
    queue: SharedQueue<P>,
    shutdown: watch::Sender<bool>,
    /// `None` once `close()` has started.
    workers: Mutex<Option<Vec<JoinHandle<()>>>>,
    state: AtomicU8,
    monitor: Arc<DispatchMonitor>,
    runtime: Handle,
    config: BusConfig,
}

impl<P> EventBus<P>
where
    P: Clone + Send + 'static,
{
    /// Create a bus and start its workers.
    ///
    /// Zero values fall back to 4 workers and a queue of 1024 jobs.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        Self::builder()
            .config(BusConfig::new(worker_count, queue_capacity))
            .build()
    }

    /// Create a bus from a full configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Start building a bus.
    #[must_use]
    pub fn builder() -> EventBusBuilder<P> {
        EventBusBuilder::new()
    }

    /// Register `handler` under `topic`.
    ///
    /// Never fails. The returned [`Subscription`] removes exactly this
    /// registration when [`Subscription::unsubscribe`] is called.
    pub fn subscribe<H>(&self, topic: &str, handler: H) -> Subscription
    where
        H: EventHandler<P>,
    {
        self.subscribe_shared(topic, Arc::new(handler))
    }

    /// Register a closure under `topic`.
    ///
    /// Same as [`EventBus::subscribe`], with closure argument types inferred.
    pub fn subscribe_fn<F, Fut>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(EventContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe_shared(topic, Arc::new(handler))
    }

    /// Register an already shared handler under `topic`.
    pub fn subscribe_shared(&self, topic: &str, handler: Arc<dyn EventHandler<P>>) -> Subscription {
        let id = self.registry.insert(topic, handler);
        debug!(topic, id, "New subscription created");

        let registry = Arc::clone(&self.registry) as Arc<dyn TopicRemoval>;
        let weak: Weak<dyn TopicRemoval> = Arc::downgrade(&registry);
        Subscription::new(id, Arc::from(topic), weak)
    }

    /// Deliver `payload` to every handler subscribed to `topic`.
    ///
    /// Fire-and-forget: returns without waiting for handlers and reports no
    /// failures. Each handler gets its own job; a full queue sends that job
    /// to a detached fallback task instead of blocking. A topic without
    /// subscribers is a no-op.
    pub fn publish(&self, ctx: EventContext, topic: &str, payload: P) {
        self.monitor.published.fetch_add(1, Ordering::Relaxed);

        let handlers = self.registry.snapshot(topic);
        if handlers.is_empty() {
            trace!(topic, "No subscribers for topic");
            return;
        }

        let topic: Arc<str> = Arc::from(topic);
        let stopping = *self.shutdown.borrow();

        for (subscription_id, handler) in handlers {
            let job = Job {
                topic: Arc::clone(&topic),
                subscription_id,
                handler,
                payload: payload.clone(),
                ctx: ctx.clone(),
            };

            // Workers are gone or going: nothing would drain the queue.
            if stopping {
                spawn_fallback(&self.runtime, job, &self.monitor);
                continue;
            }

            match self.sender.try_send(job) {
                Ok(()) => {
                    self.monitor.queued.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Full(job)) => {
                    debug!(topic = %topic, subscription_id, "Dispatch queue full, using fallback");
                    spawn_fallback(&self.runtime, job, &self.monitor);
                }
                Err(TrySendError::Closed(job)) => {
                    spawn_fallback(&self.runtime, job, &self.monitor);
                }
            }
        }
    }

    /// Stop the worker pool and wait for every worker to exit.
    ///
    /// Jobs still waiting in the queue are discarded. Fallback tasks are not
    /// waited for unless [`BusConfig::drain_fallback_on_close`] is set.
    ///
    /// Shutdown is signalled before the first await. If the returned future
    /// is dropped early the bus is still left [`BusState::Closed`] and the
    /// workers exit on their own after their current job.
    ///
    /// # Errors
    ///
    /// [`BusError::AlreadyClosed`] on every call after the first.
    pub async fn close(&self) -> Result<(), BusError> {
        let workers = self.workers.lock().take().ok_or(BusError::AlreadyClosed)?;
        self.state.store(BusState::Closing.as_u8(), Ordering::Release);
        let _closed = ClosedOnDrop(&self.state);
        info!(workers = workers.len(), "Closing event bus");

        self.shutdown.send_replace(true);
        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "Dispatch worker terminated abnormally");
            }
        }

        let discarded = self.discard_queued().await;
        if discarded > 0 {
            warn!(discarded, "Queued jobs discarded at close");
        }

        if self.config.drain_fallback_on_close {
            let in_flight = self.monitor.fallback_in_flight();
            if in_flight > 0 {
                debug!(in_flight, "Waiting for fallback tasks");
            }
            self.monitor.wait_fallback_idle().await;
        }

        info!("Event bus closed");
        Ok(())
    }

    /// Close the receiver so late `try_send`s fail over to fallback, then
    /// count what was left behind.
    async fn discard_queued(&self) -> usize {
        let mut receiver = self.queue.lock().await;
        receiver.close();
        let mut discarded = 0;
        while receiver.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BusState {
        BusState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of handlers currently subscribed to `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry.subscriber_count(topic)
    }

    /// Number of topics with at least one subscriber.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.registry.topic_count()
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Dispatch counters.
    #[must_use]
    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.monitor.published.load(Ordering::Relaxed),
            queued: self.monitor.queued.load(Ordering::Relaxed),
            fallback: self.monitor.fallback.load(Ordering::Relaxed),
            handler_failures: self.monitor.failures.load(Ordering::Relaxed),
            fallback_in_flight: self.monitor.fallback_in_flight(),
        }
    }
}

/// Builder for [`EventBus`].
pub struct EventBusBuilder<P> {
    config: BusConfig,
    observer: Option<Arc<dyn FailureObserver>>,
    runtime: Option<Handle>,
    _payload: std::marker::PhantomData<fn() -> P>,
}

impl<P> EventBusBuilder<P>
where
    P: Clone + Send + 'static,
{
    fn new() -> Self {
        Self {
            config: BusConfig::default(),
            observer: None,
            runtime: None,
            _payload: std::marker::PhantomData,
        }
    }

    /// Use `config`. Zero sizes are replaced with defaults.
    #[must_use]
    pub fn config(mut self, config: BusConfig) -> Self {
        self.config = config.normalized();
        self
    }

    /// Number of dispatch workers (0 means default).
    #[must_use]
    pub fn workers(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self.config = self.config.normalized();
        self
    }

    /// Dispatch queue capacity (0 means default).
    #[must_use]
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.config.queue_capacity = queue_capacity;
        self.config = self.config.normalized();
        self
    }

    /// Wait for fallback tasks in `close()`.
    #[must_use]
    pub fn drain_fallback_on_close(mut self, drain: bool) -> Self {
        self.config.drain_fallback_on_close = drain;
        self
    }

    /// Notify `observer` of every handler failure.
    #[must_use]
    pub fn failure_observer(mut self, observer: Arc<dyn FailureObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Spawn workers and fallback tasks on `runtime` instead of the
    /// current one.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the bus and start its workers.
    ///
    /// # Panics
    ///
    /// Panics if no runtime was supplied and this is called outside of a
    /// Tokio runtime.
    #[must_use]
    pub fn build(self) -> EventBus<P> {
        let config = self.config;
        let runtime = self.runtime.unwrap_or_else(Handle::current);
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let queue: SharedQueue<P> = Arc::new(tokio::sync::Mutex::new(receiver));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let monitor = Arc::new(DispatchMonitor::new(self.observer));

        let workers = spawn_workers(
            &runtime,
            config.worker_count,
            &queue,
            &shutdown_rx,
            &monitor,
        );

        info!(
            workers = config.worker_count,
            queue_capacity = config.queue_capacity,
            "Event bus started"
        );

        EventBus {
            registry: Arc::new(SubscriptionRegistry::new()),
            sender,
            queue,
            shutdown,
            workers: Mutex::new(Some(workers)),
            state: AtomicU8::new(BusState::Running.as_u8()),
            monitor,
            runtime,
            config,
        }
    }
}
