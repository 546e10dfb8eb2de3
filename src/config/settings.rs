//! Application settings loading from a TOML file
//!
//! Every field is optional in the file. A missing file means defaults; a file that
//! exists but cannot be parsed is an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Slot name the history is stored under
pub const DEFAULT_HISTORY_KEY: &str = "calculator_history";

/// Environment variable naming the settings file
pub const CONFIG_PATH_VAR: &str = "FABRIC_CALC_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_CALCULATION_DELAY_MS: u64 = 500;

/// Settings read from config.toml
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the storage slot holding the history
    pub history_key: String,
    /// Pause before a result is produced, in milliseconds
    pub calculation_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            calculation_delay_ms: DEFAULT_CALCULATION_DELAY_MS,
        }
    }
}

impl AppConfig {
    /// The configured pause as a [`Duration`].
    #[must_use]
    pub const fn calculation_delay(&self) -> Duration {
        Duration::from_millis(self.calculation_delay_ms)
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!("No settings file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads settings from the path in `FABRIC_CALC_CONFIG`, or `./config.toml`
///
/// # Errors
/// Same as [`load_config`].
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}
