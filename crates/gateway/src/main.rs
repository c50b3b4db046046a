//! drivelist - serves a mirrored drive folder tree over HTTP

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gateway::config::GatewayConfig;
use gateway::ServiceConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on for HTTP requests (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Directory for daily rotated log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut gateway_config = match &args.config {
        Some(path) => GatewayConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GatewayConfig::default(),
    };
    if let Some(port) = args.port {
        gateway_config.server.port = port;
    }

    let service_config = ServiceConfig {
        gateway: gateway_config,
        log_level: args.log_level,
        log_dir: args.log_dir,
    };

    gateway::process::spawn_service(&service_config).await;
    Ok(())
}
