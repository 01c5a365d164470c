//! Settings parser for the daemon config file
//!
//! Optional TOML file at `<config-dir>/macrod/config.toml`. A missing or
//! malformed file degrades to defaults with a warning, never an error:
//! configuration must not be able to keep the service from coming up.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use macrod_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const MACROD_DIR: &str = "macrod";

fn default_tick_interval_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Interval between engine ticks while running
    pub tick_interval_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the durable state directory
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from the default config location
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Load settings from an explicit file path
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// The state directory, honoring the config override
    pub fn state_dir(&self) -> PathBuf {
        self.storage
            .state_dir
            .clone()
            .unwrap_or_else(default_state_dir)
    }
}

/// Default config file path under the platform config dir
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(MACROD_DIR).join(CONFIG_FILENAME)
}

/// Default durable state directory under the platform data dir
pub fn default_state_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(MACROD_DIR).join("state")
}
