//! Anonymization result

use super::ResolvedEntity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of one `anonymize` call
///
/// `summary` and `details` are keyed by display label. Every entity counted in
/// `summary` has exactly one entry in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizerResult {
    /// Redacted text, `None` when the input was empty
    pub anonymized_text: Option<String>,
    /// Entity counts by display label
    pub summary: HashMap<String, usize>,
    /// Original matched text by display label
    pub details: HashMap<String, Vec<String>>,
    /// Resolved, non-overlapping entities in ascending start order
    #[serde(default)]
    pub entities: Vec<ResolvedEntity>,
    /// Processing time in milliseconds
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl AnonymizerResult {
    /// Result for empty input
    pub fn empty() -> Self {
        Self::default()
    }

    /// Count one redacted entity under its display label
    pub fn record(&mut self, display_label: &str, original: &str) {
        *self.summary.entry(display_label.to_string()).or_insert(0) += 1;
        self.details
            .entry(display_label.to_string())
            .or_default()
            .push(original.to_string());
    }

    /// Total number of redacted entities
    pub fn total_entities(&self) -> usize {
        self.summary.values().sum()
    }

    /// Check if anything was redacted
    pub fn has_entities(&self) -> bool {
        self.total_entities() > 0
    }

    /// Check that `summary` and `details` agree label by label
    pub fn is_consistent(&self) -> bool {
        self.summary.len() == self.details.len()
            && self
                .details
                .iter()
                .all(|(label, values)| self.summary.get(label) == Some(&values.len()))
    }

    /// Fold another result's statistics into this one
    pub fn merge_statistics(&mut self, other: &AnonymizerResult) {
        for (label, count) in &other.summary {
            *self.summary.entry(label.clone()).or_insert(0) += count;
        }
        for (label, values) in &other.details {
            self.details
                .entry(label.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
        self.processing_time_ms += other.processing_time_ms;
    }

    /// Combine the statistics of many results
    ///
    /// The combined result carries no text and no entities.
    pub fn combine<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a AnonymizerResult>,
    {
        let mut combined = Self::empty();
        for result in results {
            combined.merge_statistics(result);
        }
        combined
    }
}
