use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use common::prelude::{
    DomainSubFolders, PassEntry, SiteConfig, DEFAULT_REFRESH_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};

/// Environment variable consulted for the drive access token
pub const ACCESS_TOKEN_ENV: &str = "DRIVELIST_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Prepended to every direct download url handed out
    #[serde(default)]
    pub download_redirect_prefix: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub onedrive: OneDriveConfig,
    #[serde(default)]
    pub domain_based_sub_folders: DomainSubFolders,
    #[serde(default)]
    pub pass_list: Vec<PassEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Only this subfolder of the drive is mirrored, presented as `/`
    #[serde(default = "default_folder_sub")]
    pub folder_sub: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Talk to the China cloud instead of the global one
    #[serde(default)]
    pub china_cloud: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_port() -> u16 {
    8000
}

fn default_folder_sub() -> String {
    "/".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            folder_sub: default_folder_sub(),
            refresh_interval_secs: default_refresh_interval_secs(),
            china_cloud: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneDriveConfig {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl GatewayConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.folder_sub.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.folder_sub must start with '/': {}",
                self.server.folder_sub
            )));
        }
        if self.server.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.refresh_interval_secs must be positive".to_string(),
            ));
        }

        let domains = &self.domain_based_sub_folders;
        if domains.enable && domains.pairs.is_empty() {
            return Err(ConfigError::Invalid(
                "domain_based_sub_folders is enabled without any pairs".to_string(),
            ));
        }
        for pair in &domains.pairs {
            if !pair.sub_folder.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "sub_folder of {} must start with '/': {}",
                    pair.domain, pair.sub_folder
                )));
            }
        }

        Ok(())
    }

    /// The access token, with the environment taking precedence over the file.
    ///  Surrounding whitespace (a trailing newline from a secrets file) is
    ///  dropped.
    pub fn access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .and_then(|token| trimmed(&token))
            .or_else(|| self.onedrive.access_token.as_deref().and_then(trimmed))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.server.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// The presentation settings shared with the tree engine
    pub fn site(&self) -> SiteConfig {
        SiteConfig {
            folder_sub: self.server.folder_sub.clone(),
            domain_based_sub_folders: self.domain_based_sub_folders.clone(),
            download_redirect_prefix: self.download_redirect_prefix.clone(),
            pass_list: self.pass_list.clone(),
        }
    }
}

fn trimmed(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
