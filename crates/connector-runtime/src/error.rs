//! Runtime error types.

use thiserror::Error;

use crate::container::ConfigError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("runtime already started")]
    AlreadyStarted,

    #[error("runtime has been shut down")]
    ShutDown,
}
