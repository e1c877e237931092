//! Exporter configuration.
//!
//! Read from JSON (`config.json`, the historical default) or TOML when the
//! file name ends in `.toml`. Unset, empty or zero fields fall back to the
//! defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENDPOINT: &str = "/metrics";
pub const DEFAULT_TICKER_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("endpoint must be a plain path starting with '/': {0:?}")]
    InvalidEndpoint(String),

    #[error("invalid listen host: {0:?}")]
    InvalidHost(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Repository directories, polled in this order.
    pub repos: Vec<String>,
    /// Listen host: an IP literal or a resolvable name such as `localhost`.
    pub ip: String,
    pub port: u16,
    /// HTTP path serving the Prometheus exposition.
    pub endpoint: String,
    /// Seconds between sweeps.
    pub ticker_interval: u64,
    /// Seconds the HTTP server gets to drain on shutdown.
    pub shutdown_grace: u64,
}

impl ExporterConfig {
    /// Load, default and validate a config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let mut config: ExporterConfig = serde_json::from_str(content)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let mut config: ExporterConfig = toml::from_str(content)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Replace empty or zero fields with their defaults.
    pub fn apply_defaults(&mut self) {
        if self.ip.is_empty() {
            self.ip = DEFAULT_IP.to_string();
        }
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.endpoint.is_empty() {
            self.endpoint = DEFAULT_ENDPOINT.to_string();
        }
        if self.ticker_interval == 0 {
            self.ticker_interval = DEFAULT_TICKER_INTERVAL_SECS;
        }
        if self.shutdown_grace == 0 {
            self.shutdown_grace = DEFAULT_SHUTDOWN_GRACE_SECS;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let has_route_syntax = self
            .endpoint
            .contains(|c: char| matches!(c, '{' | '}' | '*' | ':'));
        if !self.endpoint.starts_with('/') || has_route_syntax {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.ip.is_empty() || self.ip.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(ConfigError::InvalidHost(self.ip.clone()));
        }
        Ok(())
    }

    /// Host and port to bind. Names are resolved when the listener binds.
    pub fn listen_target(&self) -> (&str, u16) {
        (self.ip.as_str(), self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.ticker_interval)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace)
    }
}
