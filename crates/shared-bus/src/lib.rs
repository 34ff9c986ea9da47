//! # Shared Bus - In-Process Event Bus
//!
//! Decouples producers (inbound adapters accepting work) from consumers
//! (handlers that process domain events asynchronously).
//!
//! ## Dispatch Pattern
//!
//! ```text
//! ┌──────────────┐  publish(ctx, topic, payload)
//! │   Producer   │ ───────────────┐
//! └──────────────┘                │
//!                                 ▼
//!                       ┌───────────────────┐
//!                       │  Registry         │ snapshot(topic)
//!                       │  topic -> handlers│ (reader lock)
//!                       └─────────┬─────────┘
//!                                 │ one job per handler
//!                    try_send     ▼          queue full
//!              ┌──────────────────┴──────────────────┐
//!              ▼                                     ▼
//!     ┌─────────────────┐                  ┌──────────────────┐
//!     │ Dispatch Queue  │                  │ Fallback task    │
//!     │ (bounded mpsc)  │                  │ (tokio::spawn)   │
//!     └────────┬────────┘                  └──────────────────┘
//!              ▼
//!     ┌─────────────────┐
//!     │  Worker Pool    │ handler.handle(ctx, payload)
//!     └─────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Non-blocking publish:** a full queue routes the job to a detached
//!   fallback task instead of waiting for space.
//! - **Exactly one executor per job:** either a worker or a fallback task.
//! - **Fire-and-forget:** handler failures never reach the publisher. An
//!   optional [`FailureObserver`] can be attached to see them.
//! - **Single close:** [`EventBus::close`] succeeds once; later calls return
//!   [`BusError::AlreadyClosed`].

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use config::{
    BusConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, MAX_QUEUE_CAPACITY, MAX_WORKER_COUNT,
};
pub use context::{CancelHandle, EventContext};
pub use dispatch::DispatchPath;
pub use error::BusError;
pub use handler::{
    EventHandler, FailureObserver, HandlerError, HandlerFailure, HandlerResult,
};
pub use publisher::{BusState, BusStats, EventBus, EventBusBuilder};
pub use subscriber::{Subscription, SubscriptionId};
