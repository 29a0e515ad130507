//! Component resolution
//!
//! Builds the comment generator, the executor and the publish pipeline from
//! configuration.

use super::config::{AppConfig, ExecutorKind, ExecutorSettings, LlmProviderKind, LlmSettings};
use anyhow::{Context, Result};
use cadence_core::{
    ActionExecutor, AdmissionController, BehaviorSynthesizer, DryRunExecutor, JitterSampler,
    PublishPipeline, RelayExecutor,
};
use cadence_llm::{CommentGenerator, MockGenerator, OpenAiCompatConfig, OpenAiCompatGenerator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Resolve the comment generator
pub fn resolve_comment_generator(settings: &LlmSettings) -> Result<Arc<dyn CommentGenerator>> {
    match settings.provider {
        LlmProviderKind::Mock => {
            warn!("Using mock comment generator");
            Ok(Arc::new(MockGenerator::default()))
        }
        LlmProviderKind::OpenaiCompat => {
            let api_key = match &settings.api_key {
                Some(key) => key.clone(),
                None => std::env::var("CADENCE_LLM_API_KEY")
                    .context("CADENCE_LLM_API_KEY is not set (or set llm.provider = \"mock\")")?,
            };
            let config = OpenAiCompatConfig::new(api_key)
                .with_base_url(&settings.base_url)
                .with_model(&settings.model)
                .with_timeout(Duration::from_secs(settings.timeout_secs))
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature);
            info!(model = %config.model, base_url = %config.base_url, "Registered comment generator");
            Ok(Arc::new(OpenAiCompatGenerator::new(config)?))
        }
    }
}

/// Resolve the action executor
pub fn resolve_executor(settings: &ExecutorSettings) -> Result<Arc<dyn ActionExecutor>> {
    match settings.kind {
        ExecutorKind::DryRun => {
            info!(time_scale = settings.time_scale, "Using dry-run executor");
            Ok(Arc::new(
                DryRunExecutor::new().with_time_scale(settings.time_scale),
            ))
        }
        ExecutorKind::Relay => {
            info!(base_url = %settings.relay.base_url, "Using browser relay executor");
            Ok(Arc::new(RelayExecutor::new(settings.relay.clone())?))
        }
    }
}

/// Build the admission-gated pipeline
pub fn build_pipeline(config: &AppConfig, executor: Arc<dyn ActionExecutor>) -> PublishPipeline {
    let admission = AdmissionController::new(
        config.admission.quota(),
        config.admission.delay(),
        JitterSampler::from_entropy(),
    );
    let synthesizer =
        BehaviorSynthesizer::new(config.behavior.clone(), JitterSampler::from_entropy());

    PublishPipeline::new(admission, synthesizer, executor).with_viewport(config.viewport)
}
