use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;

pub mod ai;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod github;
pub mod messages;
pub mod queue;
pub mod script;
pub mod selection;
pub mod session;
pub mod textstudio;
pub mod warehouse;

pub use config::Config;
pub use queue::TaskQueue;
pub use selection::{ActivePool, BulkOp, SelectionSet};
pub use session::{Draft, Session};
pub use warehouse::Warehouse;

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting kvengine...");

    let cli = cli::Cli::parse();
    let config = Config::from_env();

    cli::dispatch(cli, config).await
}
