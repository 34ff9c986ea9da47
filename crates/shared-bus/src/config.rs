//! Bus sizing configuration.

use std::env;

use tokio::sync::Semaphore;

/// Workers started when the requested count is zero.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Queue slots allocated when the requested capacity is zero.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Largest queue capacity the dispatch channel can represent.
pub const MAX_QUEUE_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Upper bound on dispatch workers.
pub const MAX_WORKER_COUNT: usize = 4096;

/// Configuration for an [`crate::EventBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Number of long-lived dispatch workers.
    pub worker_count: usize,

    /// Capacity of the bounded dispatch queue.
    pub queue_capacity: usize,

    /// Whether `close()` also waits for in-flight fallback tasks.
    pub drain_fallback_on_close: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            drain_fallback_on_close: false,
        }
    }
}

impl BusConfig {
    /// Create a configuration, substituting defaults for zero values.
    #[must_use]
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        Self {
            worker_count,
            queue_capacity,
            drain_fallback_on_close: false,
        }
        .normalized()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CC_BUS_WORKERS`: Worker count (default: 4)
    /// - `CC_BUS_QUEUE_CAPACITY`: Queue capacity (default: 1024)
    /// - `CC_BUS_DRAIN_FALLBACK`: Wait for fallback tasks on close (default: false)
    ///
    /// Sizes above [`MAX_WORKER_COUNT`] / [`MAX_QUEUE_CAPACITY`] are kept as
    /// given so callers can reject them; the bus itself clamps them.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            worker_count: lookup("CC_BUS_WORKERS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_WORKER_COUNT),

            queue_capacity: lookup("CC_BUS_QUEUE_CAPACITY")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),

            drain_fallback_on_close: lookup("CC_BUS_DRAIN_FALLBACK")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
        .with_defaults()
    }

    /// Replace zero sizes with the defaults and clamp oversized ones.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut config = self.with_defaults();
        config.worker_count = config.worker_count.min(MAX_WORKER_COUNT);
        config.queue_capacity = config.queue_capacity.min(MAX_QUEUE_CAPACITY);
        config
    }

    /// Whether both sizes are within [`MAX_WORKER_COUNT`] and
    /// [`MAX_QUEUE_CAPACITY`].
    #[must_use]
    pub fn is_within_limits(&self) -> bool {
        self.worker_count <= MAX_WORKER_COUNT && self.queue_capacity <= MAX_QUEUE_CAPACITY
    }

    fn with_defaults(mut self) -> Self {
        if self.worker_count == 0 {
            self.worker_count = DEFAULT_WORKER_COUNT;
        }
        if self.queue_capacity == 0 {
            self.queue_capacity = DEFAULT_QUEUE_CAPACITY;
        }
        self
    }
}
