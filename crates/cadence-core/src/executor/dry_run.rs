//! Executor that only waits and logs

use super::{ActionExecutor, ExecutionFailure, ExecutionReport, PublishTask};
use crate::behavior::ActionPlan;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Walks a plan honouring every delay without touching a browser.
///
/// `time_scale` multiplies each delay; `0.0` skips waiting entirely.
#[derive(Debug, Clone)]
pub struct DryRunExecutor {
    time_scale: f64,
}

impl Default for DryRunExecutor {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl DryRunExecutor {
    /// Create a dry-run executor with real-time delays
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale all delays (negative values are treated as 0)
    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    /// Scaled delay, saturating at `Duration::MAX`
    pub(crate) fn scaled(&self, delay_ms: u64) -> Duration {
        let secs = Duration::from_millis(delay_ms).as_secs_f64() * self.time_scale;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[async_trait]
impl ActionExecutor for DryRunExecutor {
    fn name(&self) -> &str {
        "dry_run"
    }

    async fn execute(
        &self,
        task: &PublishTask,
        plan: &ActionPlan,
    ) -> Result<ExecutionReport, ExecutionFailure> {
        let started = Instant::now();
        info!(target_page = %task.target, steps = plan.len(), "Dry run started");

        for (index, step) in plan.steps.iter().enumerate() {
            let wait = self.scaled(step.delay_ms);
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            debug!(index, delay_ms = step.delay_ms, interaction = ?step.interaction, "Dry run step");
        }

        info!(target_page = %task.target, "Dry run submit");
        Ok(ExecutionReport {
            executor: self.name().to_string(),
            steps_executed: plan.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
