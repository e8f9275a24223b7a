//! PII detection and redaction for free text
//!
//! Candidates come from three sources: an external learned predictor, the
//! active profile's regex patterns and its blocklist. They are merged,
//! filtered through the grantlist, reduced to a non-overlapping set and
//! substituted with display labels.
//!
//! # Architecture
//!
//! - **Chunking**: [`chunker`] splits long text into overlapping windows
//! - **Detection**: [`detector`] sources composed by [`coordinator`]
//! - **Resolution**: [`resolver`] with the address score boost
//! - **Redaction**: [`redaction`] using display labels from [`labels`]
//! - **Configuration**: [`profile`] stores and [`config`] settings
//!
//! # Usage
//!
//! ```rust,ignore
//! use text_anonymizer::anonymization::{AnonymizeOptions, Anonymizer, AnonymizerConfig};
//!
//! let anonymizer = Anonymizer::from_config(AnonymizerConfig::default(), predictor)?;
//! let result = anonymizer
//!     .anonymize("HETU: 311299-999A", &AnonymizeOptions::new().with_labels(["fi_hetu_regex"]))
//!     .await?;
//! ```

pub mod chunker;
pub mod config;
pub mod coordinator;
pub mod detector;
pub mod engine;
pub mod labels;
pub mod models;
pub mod options;
pub mod profile;
pub mod redaction;
pub mod report;
pub mod resolver;

// Re-export main types
pub use config::{AnonymizerConfig, ChunkingConfig, DEFAULT_LABELS};
pub use detector::{EntityPredictor, EntitySource};
pub use engine::Anonymizer;
pub use models::{AnonymizerResult, Candidate, PredictedEntity, ResolvedEntity, SourceKind, Span};
pub use options::AnonymizeOptions;
pub use profile::{ConfigStore, FileConfigStore, InMemoryConfigStore, Profile, RegexPattern};
pub use report::BatchReport;
