//! Batch reporting
//!
//! Aggregated statistics over many anonymized documents. Reports carry counts
//! and display labels only; the combined matched text stays in
//! [`BatchReport::details`] and is left out of the console rendering.

use crate::anonymization::models::AnonymizerResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics for one batch of documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the batch started
    pub generated_at: DateTime<Utc>,

    /// Documents submitted
    pub total_documents: usize,

    /// Total entities redacted across all documents
    pub total_entities: usize,

    /// Entity counts by display label
    pub summary: HashMap<String, usize>,

    /// Original matched text by display label
    pub details: HashMap<String, Vec<String>>,

    /// Indices of documents that failed and were left out of the output
    pub failed_documents: Vec<usize>,

    /// Warnings raised while processing
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Documents with at least one entity
    pub documents_with_pii: usize,

    /// Documents without entities
    pub documents_without_pii: usize,
}

impl BatchReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            total_documents: 0,
            total_entities: 0,
            summary: HashMap::new(),
            details: HashMap::new(),
            failed_documents: Vec::new(),
            warnings: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Add a successfully anonymized document
    pub fn add_document(&mut self, result: &AnonymizerResult) {
        self.total_documents += 1;
        self.stats.total_processing_time_ms += result.processing_time_ms;

        if result.has_entities() {
            self.stats.documents_with_pii += 1;
            self.total_entities += result.total_entities();

            for (label, count) in &result.summary {
                *self.summary.entry(label.clone()).or_insert(0) += count;
            }
            for (label, values) in &result.details {
                self.details
                    .entry(label.clone())
                    .or_default()
                    .extend(values.iter().cloned());
            }
        } else {
            self.stats.documents_without_pii += 1;
        }

        self.update_average();
    }

    /// Record a document that could not be anonymized
    pub fn add_failure(&mut self, index: usize, error: &impl std::fmt::Display) {
        self.total_documents += 1;
        self.failed_documents.push(index);
        self.add_warning(format!("Failed to anonymize document {index}: {error}"));
        self.update_average();
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Documents that produced output
    pub fn succeeded(&self) -> usize {
        self.total_documents - self.failed_documents.len()
    }

    fn update_average(&mut self) {
        let succeeded = self.succeeded();
        if succeeded > 0 {
            self.stats.avg_processing_time_ms =
                self.stats.total_processing_time_ms / succeeded as u64;
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  TEXT ANONYMIZATION REPORT                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            "  Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Total Documents Processed:   {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with PII:          {}\n",
            self.stats.documents_with_pii
        ));
        output.push_str(&format!(
            "  Documents without PII:       {}\n",
            self.stats.documents_without_pii
        ));
        output.push_str(&format!(
            "  Failed Documents:            {}\n",
            self.failed_documents.len()
        ));
        output.push_str(&format!(
            "  Total Entities Redacted:     {}\n",
            self.total_entities
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.summary.is_empty() {
            output.push_str("🔍 ENTITIES BY LABEL\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut labels: Vec<_> = self.summary.iter().collect();
            // Count descending, then label for a stable listing
            labels.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (label, count) in labels {
                output.push_str(&format!("  {:30} {:>5}\n", label, count));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file as JSON
    pub fn write_to_file(&self, path: &std::path::Path) -> crate::domain::Result<()> {
        let json = self.format_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}
