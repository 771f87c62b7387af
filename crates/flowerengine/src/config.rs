//! FlowerEngine client configuration.
//!
//! Lives in `<config dir>/flowerengine/config.toml`. Every field has a
//! default, so an empty or missing file yields a working configuration.
//!
//! ```toml
//! account = "flowerengine"
//!
//! [hive]
//! endpoints = ["https://api.hive.blog", "https://api.deathwing.me"]
//! timeout_secs = 30
//!
//! [engine]
//! timeout_secs = 10
//! ```

use crate::engine::DEFAULT_ENGINE_TIMEOUT_SECS;
use crate::error::ConfigError;
use crate::fetcher::DEFAULT_ACCOUNT;
use crate::hive::{HiveAccountLookup, DEFAULT_HIVE_ENDPOINTS, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const CONFIG_DIR: &str = "flowerengine";
const CONFIG_FILE: &str = "config.toml";

/// Hive API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiveSettings {
    /// API nodes tried in order
    #[serde(default = "default_hive_endpoints")]
    pub endpoints: Vec<String>,

    /// Per-request timeout (seconds, valid: 1-300)
    #[serde(default = "default_hive_timeout")]
    pub timeout_secs: u64,
}

fn default_hive_endpoints() -> Vec<String> {
    DEFAULT_HIVE_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

fn default_hive_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl HiveSettings {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 300))
    }
}

impl Default for HiveSettings {
    fn default() -> Self {
        Self {
            endpoints: default_hive_endpoints(),
            timeout_secs: default_hive_timeout(),
        }
    }
}

/// Settings for queries sent to the selected engine node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Per-request timeout (seconds, valid: 1-300)
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_engine_timeout() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_SECS
}

impl EngineSettings {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 300))
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_engine_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerConfig {
    /// Account whose `json_metadata` carries the node list
    #[serde(default = "default_account")]
    pub account: String,

    #[serde(default)]
    pub hive: HiveSettings,

    #[serde(default)]
    pub engine: EngineSettings,
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            hive: HiveSettings::default(),
            engine: EngineSettings::default(),
        }
    }
}

impl FlowerConfig {
    /// `<config dir>/flowerengine/config.toml`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from the default path, falling back to defaults on any error
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{} - using defaults", e);
                Self::default()
            }
        }
    }

    /// Account lookup built from the `[hive]` section
    pub fn hive_lookup(&self) -> HiveAccountLookup {
        HiveAccountLookup::new(self.hive.endpoints.clone())
            .with_timeout(self.hive.effective_timeout())
    }
}
