//! refmon - live monitor for a digital-voice reflector.
//!
//! Connects to the reflector's snapshot WebSocket and renders its modules,
//! peers and streams to the terminal.

use anyhow::Result;
use clap::Parser;
use refmon::AppConfig;
use tracing::{info, warn};

/// Reflector live monitor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "REFMON_CONFIG")]
    config: Option<String>,

    /// Reflector host, overrides the config file
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config path: --config > REFMON_CONFIG (both via clap) > default
    let config_path = AppConfig::resolve_path(args.config);
    let loaded = AppConfig::load_from(&config_path)?;
    let found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(host) = args.host {
        config.host = host;
    }

    // Logging needs the configured filter, so it starts after the file is read
    refmon_telemetry::init_logging_with(&config.telemetry.log_level)?;

    info!("Starting refmon v{}", env!("CARGO_PKG_VERSION"));
    if found {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let app = refmon::Application::new(config)?;
    app.run().await?;

    Ok(())
}
