//! Main anonymization engine
//!
//! [`Anonymizer`] ties the pipeline together: the coordinator collects
//! candidates, the grantlist removes protected terms, the resolver picks a
//! non-overlapping span set and the redactor rewrites the text.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use text_anonymizer::anonymization::{
//!     AnonymizeOptions, Anonymizer, AnonymizerConfig, EntityPredictor, InMemoryConfigStore,
//!     PredictedEntity,
//! };
//!
//! struct NoModel;
//!
//! #[async_trait::async_trait]
//! impl EntityPredictor for NoModel {
//!     async fn predict(
//!         &self,
//!         _text: &str,
//!         _labels: &[String],
//!         _threshold: f32,
//!     ) -> anyhow::Result<Vec<PredictedEntity>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # async fn example() -> text_anonymizer::domain::Result<()> {
//! let anonymizer = Anonymizer::new(
//!     AnonymizerConfig::default(),
//!     Arc::new(NoModel),
//!     Arc::new(InMemoryConfigStore::new().with_blocklist("example", ["blockword123"])),
//! )?;
//!
//! let options = AnonymizeOptions::new().with_profile("example");
//! let result = anonymizer
//!     .anonymize("Tunniste blockword123 on lauseessa.", &options)
//!     .await?;
//! println!("{:?}", result.summary);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::config::AnonymizerConfig;
use crate::anonymization::coordinator::EntitySourceCoordinator;
use crate::anonymization::detector::{EntityPredictor, ListMatcher};
use crate::anonymization::labels::LabelMapper;
use crate::anonymization::models::AnonymizerResult;
use crate::anonymization::options::AnonymizeOptions;
use crate::anonymization::profile::{ConfigStore, FileConfigStore};
use crate::anonymization::redaction::Redactor;
use crate::anonymization::report::BatchReport;
use crate::anonymization::resolver::OverlapResolver;
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Text anonymizer
///
/// Everything the anonymizer holds is fixed at construction, so calls are
/// independent of each other. It is `Send + Sync` and can be shared across
/// tasks behind an `Arc`; concurrent calls share the predictor, which must
/// tolerate concurrent use.
pub struct Anonymizer {
    config: AnonymizerConfig,
    coordinator: EntitySourceCoordinator,
    resolver: OverlapResolver,
    mapper: LabelMapper,
}

impl Anonymizer {
    /// Create an anonymizer
    ///
    /// Validates the configuration and loads the label mapping table once.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the label mapping
    /// table exists but cannot be read.
    pub fn new(
        config: AnonymizerConfig,
        predictor: Arc<dyn EntityPredictor>,
        store: Arc<dyn ConfigStore>,
    ) -> Result<Self> {
        config.validate()?;

        let mapper = LabelMapper::new(store.get_label_mappings()?);
        let coordinator = EntitySourceCoordinator::new(predictor, store, &config);
        let resolver = OverlapResolver::from_config(&config);

        tracing::info!(
            default_threshold = config.default_threshold,
            default_labels = config.default_labels.len(),
            label_mappings = mapper.len(),
            max_chars = config.chunking.max_chars,
            "Anonymizer initialized"
        );

        Ok(Self {
            config,
            coordinator,
            resolver,
            mapper,
        })
    }

    /// Create an anonymizer reading profiles from `config.config_dir`
    pub fn from_config(config: AnonymizerConfig, predictor: Arc<dyn EntityPredictor>) -> Result<Self> {
        let store = Arc::new(FileConfigStore::new(config.config_dir.clone()));
        Self::new(config, predictor, store)
    }

    /// Anonymize one text
    ///
    /// Empty input returns an empty result without touching any source.
    ///
    /// # Errors
    ///
    /// Returns an error if profile configuration cannot be read or every
    /// predictor call for the text failed.
    pub async fn anonymize(&self, text: &str, options: &AnonymizeOptions) -> Result<AnonymizerResult> {
        if text.is_empty() {
            return Ok(AnonymizerResult::empty());
        }

        let start = Instant::now();
        let threshold = options.threshold.unwrap_or(self.config.default_threshold);

        let detection = self
            .coordinator
            .detect(
                text,
                options.labels.as_deref(),
                options.profile.as_deref(),
                threshold,
            )
            .await?;

        let candidates = ListMatcher::filter_grantlist(detection.candidates, &detection.grantlist);
        let resolved = self.resolver.resolve(candidates);
        let mut result = Redactor::new(&self.mapper).redact(text, &resolved);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            profile = %detection.profile,
            chars = text.chars().count(),
            entities = result.total_entities(),
            duration_ms = result.processing_time_ms,
            "Anonymized text"
        );

        Ok(result)
    }

    /// Anonymize one text and return only the redacted text
    pub async fn anonymize_text(&self, text: &str, options: &AnonymizeOptions) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let result = self.anonymize(text, options).await?;
        Ok(result.anonymized_text.unwrap_or_default())
    }

    /// Anonymize many texts with the same options
    ///
    /// A text that fails is logged, recorded in the report and left out of the
    /// returned results; its unredacted content is never returned.
    pub async fn anonymize_batch<I, S>(
        &self,
        texts: I,
        options: &AnonymizeOptions,
    ) -> Result<(Vec<AnonymizerResult>, BatchReport)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Vec::new();
        let mut report = BatchReport::new();

        for (index, text) in texts.into_iter().enumerate() {
            match self.anonymize(text.as_ref(), options).await {
                Ok(result) => {
                    report.add_document(&result);
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!(document = index, error = %e, "Failed to anonymize document");
                    report.add_failure(index, &e);
                }
            }
        }

        tracing::info!(
            documents = report.total_documents,
            failed = report.failed_documents.len(),
            entities = report.total_entities,
            "Batch anonymization complete"
        );

        Ok((results, report))
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    pub fn label_mapper(&self) -> &LabelMapper {
        &self.mapper
    }
}
