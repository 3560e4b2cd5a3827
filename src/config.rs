//! Configuration loading and management
//!
//! Handles parsing of `taskflow.toml` from the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::suggest::DEFAULT_DELAY_MS;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "taskflow.toml";

/// Upper bound for the simulated suggestion latency.
const MAX_SUGGEST_DELAY_MS: u64 = 600_000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Suggestion provider configuration
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggest: SuggestConfig::default(),
        }
    }
}

/// Suggestion-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Simulated latency of the stub provider, in milliseconds
    #[serde(default = "default_suggest_delay_ms")]
    pub delay_ms: u64,
}

fn default_suggest_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_suggest_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `taskflow.toml` file
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.suggest.delay_ms > MAX_SUGGEST_DELAY_MS {
            return Err(crate::error::Error::InvalidConfig(format!(
                "suggest.delay_ms must be at most {MAX_SUGGEST_DELAY_MS}"
            )));
        }
        Ok(())
    }
}
