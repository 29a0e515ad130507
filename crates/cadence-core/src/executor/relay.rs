//! Executor backed by an external browser relay.
//!
//! The relay owns the browser session (sign-in, navigation, element lookup).
//! We hand it the task and the timed plan and map its answer onto
//! [`FailureCategory`].

use super::{ActionExecutor, ExecutionFailure, ExecutionReport, FailureCategory, PublishTask};
use crate::behavior::{ActionPlan, TimedAction};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

const PUBLISH_PATH: &str = "/api/v1/relay/publish";

/// Relay connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Relay base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout on top of the plan's own delays, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token sent to the relay
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:9222".to_string()
}
fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
        }
    }
}

// Keep the token out of logs
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .finish()
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    target: &'a str,
    text: &'a str,
    steps: &'a [TimedAction],
}

#[derive(Deserialize)]
struct RelayResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    category: Option<FailureCategory>,
    #[serde(default)]
    step_index: Option<usize>,
    #[serde(default)]
    steps_executed: Option<usize>,
}

/// Forwards plans to a browser relay over HTTP
pub struct RelayExecutor {
    client: Client,
    config: RelayConfig,
}

impl RelayExecutor {
    /// Create a relay executor
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client error: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), PUBLISH_PATH)
    }

    fn request_timeout(&self, plan: &ActionPlan) -> Duration {
        Duration::from_millis(self.config.timeout_ms.saturating_add(plan.total_delay_ms()))
    }
}

/// Map a non-success HTTP status to a failure category
pub(crate) fn category_for_status(status: StatusCode) -> FailureCategory {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureCategory::AuthenticationFailed,
        StatusCode::NOT_FOUND => FailureCategory::TargetMissing,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FailureCategory::NavigationTimeout
        }
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => FailureCategory::Transport,
        s if s.is_client_error() => FailureCategory::Rejected,
        _ => FailureCategory::Other,
    }
}

fn failure_from_body(body: RelayResponse, fallback: FailureCategory) -> ExecutionFailure {
    ExecutionFailure {
        category: body.category.unwrap_or(fallback),
        step_index: body.step_index,
        message: body
            .error
            .unwrap_or_else(|| "relay reported failure".to_string()),
    }
}

#[async_trait]
impl ActionExecutor for RelayExecutor {
    fn name(&self) -> &str {
        "relay"
    }

    #[instrument(skip(self, task, plan), fields(target_page = %task.target, steps = plan.len()))]
    async fn execute(
        &self,
        task: &PublishTask,
        plan: &ActionPlan,
    ) -> std::result::Result<ExecutionReport, ExecutionFailure> {
        let started = Instant::now();
        let body = RelayRequest {
            target: &task.target,
            text: &task.text,
            steps: &plan.steps,
        };

        let mut request = self
            .client
            .post(self.endpoint())
            .timeout(self.request_timeout(plan))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            let category = if e.is_timeout() {
                FailureCategory::NavigationTimeout
            } else {
                FailureCategory::Transport
            };
            warn!(error = %e, %category, "Relay request failed");
            ExecutionFailure::new(category, format!("relay unreachable: {e}"))
        })?;

        let status = response.status();
        let parsed = response.json::<RelayResponse>().await;

        if !status.is_success() {
            let fallback = category_for_status(status);
            warn!(%status, category = %fallback, "Relay returned error status");
            return Err(match parsed {
                Ok(body) => failure_from_body(body, fallback),
                Err(_) => ExecutionFailure::new(fallback, format!("relay returned {status}")),
            });
        }

        let body = parsed.map_err(|e| {
            ExecutionFailure::new(FailureCategory::Other, format!("invalid relay response: {e}"))
        })?;
        if !body.success {
            return Err(failure_from_body(body, FailureCategory::Other));
        }

        info!(elapsed_ms = started.elapsed().as_millis() as u64, "Relay publish succeeded");
        Ok(ExecutionReport {
            executor: self.name().to_string(),
            steps_executed: body.steps_executed.unwrap_or(plan.len()),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
