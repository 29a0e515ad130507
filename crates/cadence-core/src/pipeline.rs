//! Publish pipeline
//!
//! Runs one publish request through admission, synthesis, execution and
//! commit. The admission lock is held for the whole cycle, so at most one
//! admitted action is ever in flight and two requests can never claim the
//! same quota or spacing slot.

use crate::admission::{
    AdmissionController, AdmissionDecision, AdmissionSnapshot, DenyReason, SharedAdmission,
};
use crate::behavior::{ActionPlan, BehaviorSynthesizer, Viewport};
use crate::error::{Error, Result};
use crate::executor::{ActionExecutor, ExecutionReport, PublishTask};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Result of a publish request that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// The plan ran and the action was committed
    Published {
        /// Executor report
        report: ExecutionReport,
        /// Committed actions today, including this one
        daily_count: u32,
    },
    /// Retry no earlier than `wait_ms` from now
    Deferred {
        /// Milliseconds to wait
        wait_ms: u64,
    },
    /// No more actions today
    Denied {
        /// Reason for the refusal
        reason: DenyReason,
    },
}

/// Admission-gated publisher
pub struct PublishPipeline<R = StdRng> {
    admission: SharedAdmission<R>,
    synthesizer: Mutex<BehaviorSynthesizer<R>>,
    executor: Arc<dyn ActionExecutor>,
    clock: Arc<dyn Clock>,
    viewport: Viewport,
}

impl<R: Rng + Send> PublishPipeline<R> {
    /// Create a pipeline using the wall clock
    pub fn new(
        admission: AdmissionController<R>,
        synthesizer: BehaviorSynthesizer<R>,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        Self {
            admission: admission.into_shared(),
            synthesizer: Mutex::new(synthesizer),
            executor,
            clock: Arc::new(SystemClock),
            viewport: Viewport::default(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the viewport used for pointer noise
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Name of the configured executor
    pub fn executor_name(&self) -> &str {
        self.executor.name()
    }

    /// Shared admission handle
    pub fn admission(&self) -> &SharedAdmission<R> {
        &self.admission
    }

    /// Current admission status
    pub async fn snapshot(&self) -> AdmissionSnapshot {
        let now = self.clock.now();
        self.admission.lock().await.snapshot(now)
    }

    /// Synthesize a plan without admitting or executing anything
    pub fn preview(&self, text: &str) -> Result<ActionPlan> {
        let mut synthesizer = self
            .synthesizer
            .lock()
            .map_err(|_| Error::Internal("synthesizer lock poisoned".to_string()))?;
        Ok(synthesizer.plan(text, self.viewport))
    }

    /// Publish `task` if admission allows it.
    ///
    /// Executor failures are returned as [`Error::Execution`] and leave the
    /// quota and spacing state untouched.
    #[instrument(skip(self, task), fields(target_page = %task.target, chars = task.text.chars().count()))]
    pub async fn publish(&self, task: PublishTask) -> Result<PublishOutcome> {
        if task.target.trim().is_empty() {
            return Err(Error::InvalidRequest("target must not be empty".to_string()));
        }
        if task.text.trim().is_empty() {
            return Err(Error::InvalidRequest("text must not be empty".to_string()));
        }

        let mut admission = self.admission.lock().await;

        match admission.evaluate(self.clock.now()) {
            AdmissionDecision::Allowed => {}
            AdmissionDecision::Deferred { wait_ms } => {
                info!(wait_ms, "Publish deferred");
                return Ok(PublishOutcome::Deferred { wait_ms });
            }
            AdmissionDecision::Denied { reason } => {
                info!(%reason, "Publish denied");
                return Ok(PublishOutcome::Denied { reason });
            }
        }

        let plan = self.preview(&task.text)?;
        info!(
            executor = self.executor.name(),
            steps = plan.len(),
            total_delay_ms = plan.total_delay_ms(),
            "Publish admitted"
        );

        match self.executor.execute(&task, &plan).await {
            Ok(report) => {
                admission.commit(self.clock.now());
                let daily_count = admission.state().daily_count;
                info!(daily_count, elapsed_ms = report.elapsed_ms, "Publish committed");
                Ok(PublishOutcome::Published {
                    report,
                    daily_count,
                })
            }
            Err(failure) => {
                warn!(
                    category = %failure.category,
                    step_index = ?failure.step_index,
                    error = %failure.message,
                    "Publish failed, nothing committed"
                );
                Err(failure.into())
            }
        }
    }
}

#[cfg(test)]
mod tests;
