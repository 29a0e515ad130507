//! Cadence Core - Paced Publishing Engine
//!
//! This crate decides whether and when an automated publish action may run,
//! and shapes how it interacts with the target page:
//! - Jitter: bounded random delays over an injectable random source
//! - Behavior: timed keystroke, pointer and scroll traces
//! - Admission: daily quota and randomized spacing between actions
//! - Executor: the seam to whatever actually drives the browser
//! - Pipeline: admission-gated publish cycle under a single lock

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod admission;
pub mod behavior;
pub mod error;
pub mod executor;
pub mod jitter;
pub mod pipeline;

pub use admission::{
    AdmissionController, AdmissionDecision, AdmissionSnapshot, AdmissionState, DelayPolicy,
    DenyReason, QuotaPolicy, SharedAdmission,
};
pub use behavior::{
    ActionPlan, BehaviorProfile, BehaviorSynthesizer, Interaction, OffsetRange, TimedAction,
    Viewport,
};
pub use error::{Error, Result};
pub use executor::{
    ActionExecutor, DryRunExecutor, ExecutionFailure, ExecutionReport, FailureCategory,
    PublishTask, RelayConfig, RelayExecutor,
};
pub use jitter::{CountRange, DelayRange, JitterSampler};
pub use pipeline::{Clock, PublishOutcome, PublishPipeline, SystemClock};
