//! Configuration schema types
//!
//! Root settings structure mapping to the TOML file.

use crate::anonymization::config::AnonymizerConfig;
use crate::domain::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Anonymizer settings
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Validates every section
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizerError::Configuration`] naming the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.anonymizer.validate()?;
        self.logging.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(AnonymizerError::Configuration(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if !VALID_ROTATIONS.contains(&self.local_rotation.as_str()) {
            return Err(AnonymizerError::Configuration(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                VALID_ROTATIONS.join(", ")
            )));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(AnonymizerError::Configuration(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
