//! Service configuration
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `SPEND__SECTION__KEY` environment variables.

use crate::error::Result;
use crate::types::{Horizon, ResponseNaming};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SPEND";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from `path` (may not exist) and the environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key naming of `/predict` responses
    #[serde(default)]
    pub response_naming: ResponseNaming,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            response_naming: ResponseNaming::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Artifact directory, `~` is expanded
    #[serde(default = "default_models_dir")]
    pub dir: String,
    #[serde(default)]
    pub artifacts: ArtifactFiles,
}

fn default_models_dir() -> String {
    "models".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_models_dir(),
            artifacts: ArtifactFiles::default(),
        }
    }
}

impl ModelsConfig {
    /// Artifact path per horizon, in declaration order
    pub fn sources(&self) -> Vec<(Horizon, PathBuf)> {
        let dir = PathBuf::from(shellexpand::tilde(&self.dir).as_ref());
        Horizon::ALL
            .into_iter()
            .map(|h| (h, dir.join(self.artifacts.file_for(h))))
            .collect()
    }
}

/// Per-horizon artifact file names, relative to [`ModelsConfig::dir`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFiles {
    #[serde(rename = "30d", default = "default_30d")]
    pub days_30: String,
    #[serde(rename = "60d", default = "default_60d")]
    pub days_60: String,
    #[serde(rename = "90d", default = "default_90d")]
    pub days_90: String,
    #[serde(rename = "180d", default = "default_180d")]
    pub days_180: String,
}

fn default_30d() -> String {
    Horizon::Days30.default_artifact().to_string()
}

fn default_60d() -> String {
    Horizon::Days60.default_artifact().to_string()
}

fn default_90d() -> String {
    Horizon::Days90.default_artifact().to_string()
}

fn default_180d() -> String {
    Horizon::Days180.default_artifact().to_string()
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            days_30: default_30d(),
            days_60: default_60d(),
            days_90: default_90d(),
            days_180: default_180d(),
        }
    }
}

impl ArtifactFiles {
    pub fn file_for(&self, horizon: Horizon) -> &str {
        match horizon {
            Horizon::Days30 => &self.days_30,
            Horizon::Days60 => &self.days_60,
            Horizon::Days90 => &self.days_90,
            Horizon::Days180 => &self.days_180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
