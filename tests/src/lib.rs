//! # Chain Connector Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── bus_benchmarks.rs   # publish throughput, queued vs fallback
//! │
//! └── src/integration/        # Cross-crate flows
//!     ├── bus_properties.rs   # Dispatch guarantees with real payloads
//!     └── transaction_flow.rs # intake -> bus -> handler -> repository
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cc-tests
//!
//! # By category
//! cargo test -p cc-tests integration::
//!
//! # Benchmarks
//! cargo bench -p cc-tests
//! ```

#![allow(dead_code)]

pub mod integration;
