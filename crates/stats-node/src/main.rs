//! stats aggregator binary
//!
//! Collects samples pushed over JSON-RPC and serves them to the dashboard.

mod cli;
mod config;
mod node;

use anyhow::{Context, Result};
use cli::Cli;
use config::NodeConfig;
use node::Node;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let fmt_layer = if cli.log_json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    let config = NodeConfig::from_cli(&cli).context("invalid configuration")?;
    let node = Node::new(config);

    node.run_until(shutdown_signal())
        .await
        .context("stats server failed")?;

    tracing::info!("stats stopped");

    Ok(())
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
