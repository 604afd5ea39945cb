//! Config file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::Theme;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project_id: Option<String>,
    pub emulator_host: Option<String>,
    pub templates_dir: Option<PathBuf>,
    pub auto_ack: bool,
    pub theme: Theme,
    pub log_level: Option<String>,
    /// Flow-control bound for subscription streams.
    pub max_outstanding_messages: Option<usize>,
}

pub trait ConfigService: Send + Sync {
    fn load(&self) -> Result<AppConfig, ConfigError>;
}

/// Reads a JSON file; a missing file yields the defaults.
#[derive(Debug, Clone)]
pub struct JsonConfigService {
    path: PathBuf,
}

impl JsonConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{config_dir}/pubsub-tui/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pubsub-tui")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigService for JsonConfigService {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            log::debug!("No config file at {}", self.path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
