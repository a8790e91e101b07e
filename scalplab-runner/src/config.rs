//! Runner configuration — arbitration policy, journal location, and the
//! embedded engine configuration, loadable from one TOML file.

use crate::arbiter::DuplicatePolicy;
use scalplab_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Duplicate arbitration policy. Documented default: replace.
    pub policy: DuplicatePolicy,
    /// JSONL commit journal; no journal when absent.
    pub journal: Option<PathBuf>,
    /// Engine configuration, overridable inline under `[engine]`.
    pub engine: EngineConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Engine(#[from] scalplab_core::ConfigError),
}

impl RunnerConfig {
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.engine.validate()?;
        Ok(config)
    }
}
