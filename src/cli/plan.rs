//! `cadence plan` command

use crate::server::load_config;
use anyhow::{bail, Context, Result};
use cadence_core::{ActionPlan, BehaviorProfile, BehaviorSynthesizer, JitterSampler, Viewport};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PlanOutput {
    seed: Option<u64>,
    steps: usize,
    total_delay_ms: u64,
    plan: ActionPlan,
}

/// Run the plan command
pub fn run(text: &str, seed: Option<u64>) -> Result<()> {
    let config = load_config()?;
    let output = build_plan(&config.behavior, config.viewport, text, seed)?;
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize plan")?;
    println!("{json}");
    Ok(())
}

fn build_plan(
    profile: &BehaviorProfile,
    viewport: Viewport,
    text: &str,
    seed: Option<u64>,
) -> Result<PlanOutput> {
    if text.is_empty() {
        bail!("--text must not be empty");
    }
    if let Err(e) = profile.validate() {
        bail!("behavior: {e}");
    }

    let sampler = match seed {
        Some(seed) => JitterSampler::seeded(seed),
        None => JitterSampler::from_entropy(),
    };
    let plan = BehaviorSynthesizer::new(profile.clone(), sampler).plan(text, viewport);

    Ok(PlanOutput {
        seed,
        steps: plan.len(),
        total_delay_ms: plan.total_delay_ms(),
        plan,
    })
}
