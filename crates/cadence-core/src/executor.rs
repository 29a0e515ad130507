//! Action executors
//!
//! An executor performs a synthesized [`ActionPlan`] against a live page:
//! navigation and sign-in preamble, the timed steps in order, then the final
//! submit. The core only decides what to run; executors own the I/O.
//!
//! - [`DryRunExecutor`]: honours step delays and logs, touches nothing
//! - [`RelayExecutor`]: forwards the plan to an external browser relay over HTTP

mod dry_run;
mod relay;

pub use dry_run::DryRunExecutor;
pub use relay::{RelayConfig, RelayExecutor};

use crate::behavior::ActionPlan;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Inbound request to publish `text` on `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTask {
    /// Target page identifier (usually a URL)
    pub target: String,
    /// Comment text to publish
    pub text: String,
}

impl PublishTask {
    /// Create a task
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
        }
    }
}

/// Failure category reported by an executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Page load or step did not complete in time
    NavigationTimeout,
    /// Sign-in against the target failed
    AuthenticationFailed,
    /// The element to interact with was not found
    TargetMissing,
    /// The executor could not be reached
    Transport,
    /// The executor refused the request
    Rejected,
    /// Anything else
    Other,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NavigationTimeout => "navigation_timeout",
            Self::AuthenticationFailed => "authentication_failed",
            Self::TargetMissing => "target_missing",
            Self::Transport => "transport",
            Self::Rejected => "rejected",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Executor failure with enough context for the caller to decide on a retry
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{category}: {message}")]
pub struct ExecutionFailure {
    /// Failure category
    pub category: FailureCategory,
    /// Index of the plan step that failed, if known
    pub step_index: Option<usize>,
    /// Human-readable detail
    pub message: String,
}

impl ExecutionFailure {
    /// Create a failure without a step index
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            step_index: None,
            message: message.into(),
        }
    }

    /// Attach the failing step index
    #[must_use]
    pub fn at_step(mut self, index: usize) -> Self {
        self.step_index = Some(index);
        self
    }
}

/// Summary of a successful execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Executor that ran the plan
    pub executor: String,
    /// Number of plan steps performed
    pub steps_executed: usize,
    /// Wall-clock time spent, in milliseconds
    pub elapsed_ms: u64,
}

/// Performs a timed interaction plan against the target.
///
/// Implementations must run steps in order and wait each step's delay before
/// performing it.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Executor name for logs and reports
    fn name(&self) -> &str;

    /// Run `plan` for `task`, including the final submit
    async fn execute(
        &self,
        task: &PublishTask,
        plan: &ActionPlan,
    ) -> std::result::Result<ExecutionReport, ExecutionFailure>;
}
