//! Configuration validation
//!
//! Rejects inconsistent limits before anything starts, and warns about
//! risky production settings.

use super::config::{AppConfig, ExecutorKind};
use anyhow::{bail, Result};
use tracing::warn;

/// Largest accepted dry-run delay multiplier
const MAX_TIME_SCALE: f64 = 100.0;

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if let Err(e) = config.admission.quota().validate() {
        bail!("admission: {e}");
    }
    if let Err(e) = config.admission.delay().validate() {
        bail!("admission: {e}");
    }
    if let Err(e) = config.behavior.validate() {
        bail!("behavior: {e}");
    }
    if config.viewport.width == 0 || config.viewport.height == 0 {
        warn!(
            width = config.viewport.width,
            height = config.viewport.height,
            "Viewport has zero area; plans will contain no pointer moves"
        );
    }
    let time_scale = config.executor.time_scale;
    if !time_scale.is_finite() || !(0.0..=MAX_TIME_SCALE).contains(&time_scale) {
        bail!("executor: time_scale must be between 0 and {MAX_TIME_SCALE}");
    }
    if config.executor.kind == ExecutorKind::Relay && config.executor.relay.base_url.is_empty() {
        bail!("executor.relay: base_url is required when kind = \"relay\"");
    }
    if config.admission.daily_cap == 0 {
        warn!("admission.daily_cap is 0; every publish request will be denied");
    }

    validate_production_config(config);
    Ok(())
}

/// Warn about settings that are unsafe in production
fn validate_production_config(config: &AppConfig) {
    let is_production = std::env::var("CADENCE_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false);

    if !is_production {
        return;
    }

    if config.server.host == "0.0.0.0" {
        warn!(
            "SECURITY WARNING: Server is binding to all interfaces (0.0.0.0) in production. \
             Consider binding to 127.0.0.1 and using a reverse proxy."
        );
    }

    if config.executor.kind == ExecutorKind::DryRun {
        warn!("Executor is dry_run in production; nothing will be published");
    }

    if config.executor.kind == ExecutorKind::Relay
        && config.executor.relay.api_key.is_none()
        && !config.executor.relay.base_url.contains("127.0.0.1")
        && !config.executor.relay.base_url.contains("localhost")
    {
        warn!("SECURITY WARNING: Remote relay configured without an api_key");
    }
}
