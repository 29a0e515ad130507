//! CLI module for Cadence
//!
//! Provides commands:
//! - `serve`: Run the HTTP server (default)
//! - `plan`: Print a synthesized interaction plan for a text

use clap::{Parser, Subcommand};

pub mod plan;

/// Cadence comment publisher CLI
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Paced, human-like comment publishing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Print the interaction plan for a text as JSON
    Plan {
        /// Text to type
        #[arg(short, long)]
        text: String,
        /// Seed for a reproducible plan
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Plan { text, seed }) => plan::run(&text, seed),
        Some(Commands::Serve) | None => crate::server::run().await,
    }
}
