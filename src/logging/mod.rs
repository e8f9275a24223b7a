//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Human-readable console output
//! - Optional JSON file logging with rotation
//!
//! Matched PII text never appears in log fields; the pipeline logs counts,
//! labels and offsets only.
//!
//! # Example
//!
//! ```no_run
//! use text_anonymizer::config::LoggingConfig;
//! use text_anonymizer::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! tracing::info!("Anonymizer service started");
//! # Ok::<(), text_anonymizer::domain::AnonymizerError>(())
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};
