//! Central module for client configuration.
//!
//! Settings are layered with figment:
//! 1. Built-in defaults
//! 2. `pothole.yaml` in the working directory, or the file passed with
//!    `--config` (which must then exist)
//! 3. `POTHOLE_*` environment variables, e.g. `POTHOLE_BASE_URL`
//!
//! The merged result is validated before use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::services::DASHBOARD_ALERT_LIMIT;

pub const DEFAULT_CONFIG_FILE: &str = "pothole.yaml";
pub const ENV_PREFIX: &str = "POTHOLE_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Root URL of the remote API.
    #[validate(url)]
    pub base_url: String,

    /// Directory the session (and any other persisted key) is stored in.
    pub storage_dir: PathBuf,

    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,

    #[validate(range(min = 1, max = 3600))]
    pub alert_poll_interval_secs: u64,

    #[validate(range(min = 1, max = 100))]
    pub recent_alert_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            storage_dir: PathBuf::from(".pothole"),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            alert_poll_interval_secs: 10,
            recent_alert_limit: DASHBOARD_ALERT_LIMIT,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("configuration parsing error: {0}")]
    Parsing(#[from] Box<figment::Error>),

    #[error("invalid base URL: {0:?}")]
    InvalidBaseUrl(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parsing(Box::new(err))
    }
}

impl ClientConfig {
    /// Layered provider chain. An explicit `path` replaces the default file.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(ClientConfig::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
        }
        Self::from_figment(Self::figment(path))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: ClientConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alert_poll_interval_secs)
    }
}
