//! # Transactions Subsystem
//!
//! Accepts outbound transaction submissions, publishes them on the event bus
//! and persists them once the created-transaction handler picks them up.
//!
//! ## Flow
//!
//! ```text
//! TransactionSubmission ──parse──→ Transaction ──publish──→ "transaction.created"
//!                                                                 │
//!                        TransactionCreatedHandler ←──────────────┘
//!                                  │
//!                                  ▼
//!                 TransactionService::create_transaction
//!                                  │
//!                                  ▼
//!                  TransactionRepository::save (status = pending)
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - in-memory repository, bus handler, intake,         │
//! │              failure observer                                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - TransactionApi trait                       │
//! │  ports/outbound.rs - TransactionRepository trait                │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/service.rs    - TransactionService                      │
//! │  domain/submission.rs - TransactionSubmission parsing           │
//! │  domain/errors.rs     - TransactionError enum                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;

/// Component name used in structured log fields.
pub(crate) const COMPONENT: &str = "transactions";
