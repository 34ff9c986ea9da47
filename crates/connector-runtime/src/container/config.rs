//! # Runtime Configuration
//!
//! Unified configuration for the bus, logging and topic wiring.

use std::env;

use cc_telemetry::TelemetryConfig;
use shared_bus::{BusConfig, MAX_QUEUE_CAPACITY, MAX_WORKER_COUNT};
use shared_types::topics;
use thiserror::Error;

/// Complete connector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Event bus sizing.
    pub bus: BusConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
    /// Topic the intake publishes on and the created-transaction handler
    /// listens on.
    pub transaction_topic: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            telemetry: TelemetryConfig::default(),
            transaction_topic: topics::TRANSACTION_CREATED.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the environment.
    ///
    /// See [`BusConfig::from_env`] and [`TelemetryConfig::from_env`];
    /// `CC_TRANSACTION_TOPIC` overrides the transaction topic.
    pub fn from_env() -> Self {
        Self {
            bus: BusConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            transaction_topic: topic_from(env::var("CC_TRANSACTION_TOPIC").ok()),
        }
    }

    /// Reject configurations the runtime cannot wire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transaction_topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.bus.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::BusSizeOutOfRange {
                field: "worker_count",
                value: self.bus.worker_count,
                max: MAX_WORKER_COUNT,
            });
        }
        if self.bus.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::BusSizeOutOfRange {
                field: "queue_capacity",
                value: self.bus.queue_capacity,
                max: MAX_QUEUE_CAPACITY,
            });
        }
        Ok(())
    }
}

fn topic_from(raw: Option<String>) -> String {
    raw.filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| topics::TRANSACTION_CREATED.to_string())
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Producer and consumer would not meet on any topic.
    #[error("transaction topic must not be empty")]
    EmptyTopic,

    /// A bus size is larger than the bus supports.
    #[error("bus {field} {value} exceeds maximum {max}")]
    BusSizeOutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },
}
