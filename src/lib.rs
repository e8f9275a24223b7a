// Text Anonymizer - PII detection and redaction for free text
// Copyright (c) 2025 Text Anonymizer Contributors
// Licensed under the MIT License

//! # Text Anonymizer
//!
//! Finds and redacts personally identifiable information in free text by
//! combining an external learned entity predictor with deterministic regex
//! and list matchers, then reconciling overlapping findings into one
//! consistent redaction.
//!
//! ## Architecture
//!
//! - [`anonymization`] - Chunking, detection, overlap resolution, redaction
//! - [`config`] - TOML settings with environment overrides
//! - [`domain`] - Error and result types
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use text_anonymizer::anonymization::{AnonymizeOptions, Anonymizer, EntityPredictor};
//! use text_anonymizer::config::load_config;
//! use text_anonymizer::logging::init_logging;
//!
//! # async fn example(predictor: Arc<dyn EntityPredictor>) -> text_anonymizer::domain::Result<()> {
//! let settings = load_config("text-anonymizer.toml")?;
//! let _guard = init_logging(&settings.logging.level, &settings.logging)?;
//!
//! let anonymizer = Anonymizer::from_config(settings.anonymizer, predictor)?;
//! let result = anonymizer
//!     .anonymize("Matti Meikäläinen, HETU 311299-999A", &AnonymizeOptions::new())
//!     .await?;
//!
//! println!("{}", result.anonymized_text.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Labels
//!
//! Requested labels follow a suffix convention: `person_ner` goes to the
//! predictor as `person`, `fi_hetu_regex` selects the `FI_HETU` pattern and
//! the literal `blocklist` turns on blocklist matching. Redacted spans are replaced
//! with `<DISPLAY_LABEL>` tags taken from `label_mappings.txt`.

pub mod anonymization;
pub mod config;
pub mod domain;
pub mod logging;
