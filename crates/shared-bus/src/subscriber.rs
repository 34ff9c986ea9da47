//! # Subscription Registry
//!
//! Thread-safe mapping from topic to the handlers currently subscribed to it.
//!
//! Reads (publish snapshots) share a reader lock; subscribe and unsubscribe
//! take the writer lock. Handlers are never executed while either lock is
//! held: `snapshot` copies the handler set out first.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use crate::handler::EventHandler;

/// Identifier of a subscription, unique within one bus and never reused.
pub type SubscriptionId = u64;

type SharedHandler<P> = Arc<dyn EventHandler<P>>;

/// Handlers keyed by id so snapshots iterate in subscription order.
type TopicHandlers<P> = BTreeMap<SubscriptionId, SharedHandler<P>>;

pub(crate) struct SubscriptionRegistry<P> {
    topics: RwLock<HashMap<String, TopicHandlers<P>>>,
    next_id: AtomicU64,
}

impl<P: Send + 'static> SubscriptionRegistry<P> {
    pub(crate) fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register `handler` under `topic` and return its id.
    pub(crate) fn insert(&self, topic: &str, handler: SharedHandler<P>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics
            .write()
            .entry(topic.to_owned())
            .or_default()
            .insert(id, handler);
        id
    }

    /// Point-in-time copy of the handlers for `topic`.
    pub(crate) fn snapshot(&self, topic: &str) -> Vec<(SubscriptionId, SharedHandler<P>)> {
        let topics = self.topics.read();
        let Some(handlers) = topics.get(topic) else {
            return Vec::new();
        };
        handlers
            .iter()
            .map(|(id, handler)| (*id, Arc::clone(handler)))
            .collect()
    }

    pub(crate) fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map_or(0, BTreeMap::len)
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.read().len()
    }
}

/// Removal side of the registry, erased over the payload type so
/// [`Subscription`] handles are not generic.
pub(crate) trait TopicRemoval: Send + Sync {
    fn remove(&self, topic: &str, id: SubscriptionId) -> bool;
}

impl<P: Send + 'static> TopicRemoval for SubscriptionRegistry<P> {
    fn remove(&self, topic: &str, id: SubscriptionId) -> bool {
        let mut topics = self.topics.write();
        let Some(handlers) = topics.get_mut(topic) else {
            return false;
        };
        let removed = handlers.remove(&id).is_some();
        if handlers.is_empty() {
            topics.remove(topic);
        }
        removed
    }
}

/// Capability that removes exactly one `(topic, id)` registration.
///
/// Dropping the handle does **not** unsubscribe; call [`Subscription::unsubscribe`].
/// Jobs already created from an earlier publish still run after unsubscribing.
pub struct Subscription {
    id: SubscriptionId,
    topic: Arc<str>,
    registry: Weak<dyn TopicRemoval>,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, topic: Arc<str>, registry: Weak<dyn TopicRemoval>) -> Self {
        Self {
            id,
            topic,
            registry,
            active: AtomicBool::new(true),
        }
    }

    /// The subscription id.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this subscription listens on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Whether `unsubscribe` has not been called yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Remove the handler from future publish snapshots.
    ///
    /// Returns `true` only for the call that actually removed it; repeated
    /// calls are no-ops.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.remove(&self.topic, self.id);
        debug!(topic = %self.topic, id = self.id, "Subscription removed");
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("active", &self.is_active())
            .finish()
    }
}
