//! Anonymizer configuration

use crate::domain::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Labels used when neither the call nor the profile names any
pub const DEFAULT_LABELS: &[&str] = &[
    "person_ner",
    "phone_number_ner",
    "email_ner",
    "address_ner",
    "fi_hetu_regex",
    "fi_puhelin_regex",
    "fi_rekisteri_regex",
    "fi_kiinteisto_regex",
    "iban_regex",
    "tiedosto_regex",
];

/// Chunking limits, counted in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk handed to the predictor
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Approximate overlap between consecutive chunks
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,

    /// How far back from a window end to look for a sentence break
    #[serde(default = "default_sentence_search_chars")]
    pub sentence_search_chars: usize,

    /// How far back from a window end to look for any whitespace
    #[serde(default = "default_whitespace_search_chars")]
    pub whitespace_search_chars: usize,
}

fn default_max_chars() -> usize {
    1500
}

fn default_overlap_chars() -> usize {
    100
}

fn default_sentence_search_chars() -> usize {
    300
}

fn default_whitespace_search_chars() -> usize {
    100
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap_chars: default_overlap_chars(),
            sentence_search_chars: default_sentence_search_chars(),
            whitespace_search_chars: default_whitespace_search_chars(),
        }
    }
}

impl ChunkingConfig {
    /// Validate chunking limits
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(AnonymizerError::Configuration(
                "chunking.max_chars must be greater than 0".to_string(),
            ));
        }
        if self.overlap_chars >= self.max_chars {
            return Err(AnonymizerError::Configuration(format!(
                "chunking.overlap_chars ({}) must be smaller than chunking.max_chars ({})",
                self.overlap_chars, self.max_chars
            )));
        }
        Ok(())
    }
}

/// Anonymizer configuration
///
/// Everything here is fixed once an [`Anonymizer`](crate::anonymization::Anonymizer)
/// is constructed, so calls never observe each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Root directory of the on-disk profile store
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Predictor confidence threshold used when a call does not give one
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Labels used when neither the call nor the profile supplies any
    #[serde(default = "default_labels")]
    pub default_labels: Vec<String>,

    /// Score added to address candidates that overlap a person candidate
    #[serde(default = "default_address_boost")]
    pub address_boost: f32,

    /// Lowest threshold the dedicated address pass may run at
    #[serde(default = "default_address_threshold_floor")]
    pub address_threshold_floor: f32,

    /// Labels that denote an address
    #[serde(default = "default_address_labels")]
    pub address_labels: Vec<String>,

    /// Labels that denote a person
    #[serde(default = "default_person_labels")]
    pub person_labels: Vec<String>,

    /// Predictor calls in flight per request
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Chunking limits
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_threshold() -> f32 {
    0.6
}

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|l| l.to_string()).collect()
}

fn default_address_boost() -> f32 {
    0.15
}

fn default_address_threshold_floor() -> f32 {
    0.3
}

fn default_address_labels() -> Vec<String> {
    vec!["address".to_string()]
}

fn default_person_labels() -> Vec<String> {
    vec!["person".to_string()]
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            default_threshold: default_threshold(),
            default_labels: default_labels(),
            address_boost: default_address_boost(),
            address_threshold_floor: default_address_threshold_floor(),
            address_labels: default_address_labels(),
            person_labels: default_person_labels(),
            max_concurrency: default_max_concurrency(),
            chunking: ChunkingConfig::default(),
        }
    }
}

impl AnonymizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_threshold", self.default_threshold),
            ("address_boost", self.address_boost),
            ("address_threshold_floor", self.address_threshold_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnonymizerError::Configuration(format!(
                    "anonymizer.{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        if self.max_concurrency == 0 {
            return Err(AnonymizerError::Configuration(
                "anonymizer.max_concurrency must be at least 1".to_string(),
            ));
        }

        self.chunking.validate()
    }

    /// Apply environment variable overrides
    ///
    /// Variables follow the pattern `TEXT_ANONYMIZER_ANONYMIZER_<KEY>`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_ANONYMIZER_CONFIG_DIR") {
            self.config_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_ANONYMIZER_DEFAULT_THRESHOLD") {
            self.default_threshold = parse_env("TEXT_ANONYMIZER_ANONYMIZER_DEFAULT_THRESHOLD", &val)?;
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_ANONYMIZER_DEFAULT_LABELS") {
            self.default_labels = val
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_ANONYMIZER_ADDRESS_BOOST") {
            self.address_boost = parse_env("TEXT_ANONYMIZER_ANONYMIZER_ADDRESS_BOOST", &val)?;
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_ANONYMIZER_MAX_CONCURRENCY") {
            self.max_concurrency = parse_env("TEXT_ANONYMIZER_ANONYMIZER_MAX_CONCURRENCY", &val)?;
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_CHUNKING_MAX_CHARS") {
            self.chunking.max_chars = parse_env("TEXT_ANONYMIZER_CHUNKING_MAX_CHARS", &val)?;
        }

        if let Ok(val) = std::env::var("TEXT_ANONYMIZER_CHUNKING_OVERLAP_CHARS") {
            self.chunking.overlap_chars = parse_env("TEXT_ANONYMIZER_CHUNKING_OVERLAP_CHARS", &val)?;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AnonymizerError::Configuration(format!("Invalid {name} value: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizerConfig::default();
        assert_eq!(config.default_threshold, 0.6);
        assert_eq!(config.address_boost, 0.15);
        assert_eq!(config.default_labels.len(), DEFAULT_LABELS.len());
        assert_eq!(config.chunking.max_chars, 1500);
        assert_eq!(config.chunking.overlap_chars, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = AnonymizerConfig {
            default_threshold: 1.5,
            ..AnonymizerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_threshold"));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let config = AnonymizerConfig {
            chunking: ChunkingConfig {
                max_chars: 100,
                overlap_chars: 100,
                ..ChunkingConfig::default()
            },
            ..AnonymizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = AnonymizerConfig {
            max_concurrency: 0,
            ..AnonymizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AnonymizerConfig = toml::from_str(
            r#"
default_threshold = 0.4

[chunking]
max_chars = 800
"#,
        )
        .unwrap();
        assert_eq!(config.default_threshold, 0.4);
        assert_eq!(config.chunking.max_chars, 800);
        assert_eq!(config.chunking.overlap_chars, 100);
        assert_eq!(config.address_labels, vec!["address".to_string()]);
    }
}
