//! ZkCert Registry Node: entry point.
//!
//! Starts the credential registry with configuration from a TOML file or defaults.

mod api;
mod config;
mod node;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::ZkcertConfig;
use node::RegistryNode;

/// ZkCert Registry Node
#[derive(Parser, Debug)]
#[command(name = "zkcert-node", version, about = "ZkCert Credential Registry Node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "zkcert.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = ZkcertConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    // Handle --init flag
    if args.init {
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote config");
        return Ok(());
    }

    tracing::info!("ZkCert Registry Node v{}", env!("CARGO_PKG_VERSION"));

    let node = RegistryNode::new(config)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = node.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP API server error");
                return Err(e);
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    tracing::info!(
        events = node.service().event_count(),
        credentials = node.service().store().len(),
        "ZkCert node exited cleanly"
    );
    Ok(())
}
