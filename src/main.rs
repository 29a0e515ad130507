//! Cadence - paced comment publishing
//!
//! CLI entry point for the Cadence server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // CADENCE_LOG_FORMAT=json switches to one JSON object per line
    let json_logs = std::env::var("CADENCE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,tower_http=info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let cli = cli::Cli::parse();

    if !matches!(cli.command, Some(cli::Commands::Plan { .. })) {
        info!("Starting Cadence v{}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli).await
}
