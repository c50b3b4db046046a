use std::path::PathBuf;

use crate::config::GatewayConfig;

#[derive(Debug)]
pub struct Config {
    /// Settings loaded from the config file
    pub gateway: GatewayConfig,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
