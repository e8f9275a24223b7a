//! Configuration management
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `TEXT_ANONYMIZER_<SECTION>_<KEY>` overrides
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [anonymizer]
//! config_dir = "${TEXT_ANONYMIZER_HOME}/config"
//! default_threshold = 0.6
//! address_boost = 0.15
//! max_concurrency = 4
//!
//! [anonymizer.chunking]
//! max_chars = 1500
//! overlap_chars = 100
//!
//! [logging]
//! level = "info"
//! local_enabled = true
//! local_path = "logs"
//! local_rotation = "daily"
//! ```
//!
//! Profile data (blocklists, grantlists, patterns, label mappings) lives in
//! plain text files under `config_dir`; see
//! [`FileConfigStore`](crate::anonymization::profile::FileConfigStore).

pub mod loader;
pub mod schema;

pub use crate::anonymization::config::{AnonymizerConfig, ChunkingConfig};
pub use loader::load_config;
pub use schema::{LoggingConfig, Settings};
