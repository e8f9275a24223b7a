//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::Settings;
use crate::domain::{AnonymizerError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`Settings`]
/// 4. Applies environment variable overrides (`TEXT_ANONYMIZER_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use text_anonymizer::config::load_config;
///
/// let settings = load_config("text-anonymizer.toml")?;
/// println!("Profiles in {}", settings.anonymizer.config_dir.display());
/// # Ok::<(), text_anonymizer::domain::AnonymizerError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut settings: Settings = toml::from_str(&contents)
        .map_err(|e| AnonymizerError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut settings)?;

    settings.validate().map_err(|e| {
        AnonymizerError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(path = %path.display(), "Configuration loaded");

    Ok(settings)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{}}}", var_name), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `TEXT_ANONYMIZER_*` prefix
///
/// Variables follow the pattern `TEXT_ANONYMIZER_<SECTION>_<KEY>`, for
/// example `TEXT_ANONYMIZER_LOGGING_LEVEL`.
fn apply_env_overrides(settings: &mut Settings) -> Result<()> {
    settings.anonymizer.apply_env_overrides()?;

    if let Ok(val) = std::env::var("TEXT_ANONYMIZER_LOGGING_LEVEL") {
        settings.logging.level = val;
    }
    if let Ok(val) = std::env::var("TEXT_ANONYMIZER_LOGGING_LOCAL_ENABLED") {
        settings.logging.local_enabled = val.parse().map_err(|_| {
            AnonymizerError::Configuration(format!(
                "Invalid TEXT_ANONYMIZER_LOGGING_LOCAL_ENABLED value: {val}"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("TEXT_ANONYMIZER_LOGGING_LOCAL_PATH") {
        settings.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("TEXT_ANONYMIZER_LOGGING_LOCAL_ROTATION") {
        settings.logging.local_rotation = val;
    }

    Ok(())
}
