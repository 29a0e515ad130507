//! Error types for cadence-core

use crate::executor::ExecutionFailure;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The executor failed; nothing was committed
    #[error("execution failed: {0}")]
    Execution(#[from] ExecutionFailure),

    /// Inbound request rejected before admission
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (poisoned lock, serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
