//! # Integration Flows
//!
//! Tests that exercise the bus together with the transactions subsystem and
//! the runtime wiring.

pub mod bus_properties;

use std::time::{Duration, Instant};

/// Poll `check` until it returns `true` or `within` elapses.
pub async fn eventually(within: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
