//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types, with
//! the exception of the predictor seam which carries the collaborator's own
//! `anyhow` error as a message.

use thiserror::Error;

/// Main anonymizer error type
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Invalid settings or settings file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A profile exists but could not be loaded
    #[error("Profile error: {0}")]
    Profile(String),

    /// A regex pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// The entity predictor failed
    #[error("Predictor error: {0}")]
    Predictor(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for AnonymizerError {
    fn from(err: std::io::Error) -> Self {
        AnonymizerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AnonymizerError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for AnonymizerError {
    fn from(err: regex::Error) -> Self {
        AnonymizerError::Pattern(err.to_string())
    }
}

impl From<anyhow::Error> for AnonymizerError {
    fn from(err: anyhow::Error) -> Self {
        AnonymizerError::Predictor(format!("{err:#}"))
    }
}
