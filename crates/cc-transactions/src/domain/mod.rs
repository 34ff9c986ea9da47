//! Domain layer for the transactions subsystem.

pub mod errors;
pub mod service;
pub mod submission;

pub use errors::*;
pub use service::*;
pub use submission::*;
