//! Per-call anonymization options

use serde::{Deserialize, Serialize};

/// Options for one anonymize call
///
/// Every field is optional: `labels` falls back to the profile's label set and
/// then to the configured defaults, `profile` to `default`, and `threshold` to
/// the configured default threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizeOptions {
    /// Requested labels using the `_ner` / `_regex` suffix convention
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Profile name; naming one enables blocklist matching
    #[serde(default)]
    pub profile: Option<String>,
    /// Predictor confidence threshold in `[0, 1]`
    #[serde(default)]
    pub threshold: Option<f32>,
}

impl AnonymizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
