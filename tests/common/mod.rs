//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use text_anonymizer::anonymization::{
    Anonymizer, AnonymizerConfig, EntityPredictor, PredictedEntity,
};

/// Scripted predictor that reports fixed phrases
///
/// Every occurrence of a phrase is returned when its label is requested and
/// its score reaches the threshold. Calls are recorded for inspection.
#[derive(Default)]
pub struct KeywordPredictor {
    entries: Vec<(String, String, f32)>,
    fail_marker: Option<String>,
    calls: Mutex<Vec<(Vec<String>, f32)>>,
}

impl KeywordPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, phrase: &str, label: &str, score: f32) -> Self {
        self.entries
            .push((phrase.to_string(), label.to_string(), score));
        self
    }

    /// Fail every call whose text contains `marker`
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(Vec<String>, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityPredictor for KeywordPredictor {
    async fn predict(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> anyhow::Result<Vec<PredictedEntity>> {
        self.calls
            .lock()
            .unwrap()
            .push((labels.to_vec(), threshold));

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                anyhow::bail!("inference failed on chunk");
            }
        }

        let mut found = Vec::new();
        for (phrase, label, score) in &self.entries {
            if *score < threshold || !labels.iter().any(|l| l == label) {
                continue;
            }
            for (start, matched) in text.match_indices(phrase.as_str()) {
                found.push(PredictedEntity {
                    start,
                    end: start + matched.len(),
                    text: matched.to_string(),
                    label: label.clone(),
                    score: *score,
                });
            }
        }
        Ok(found)
    }
}

/// The `config/` directory shipped with the crate
pub fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}

pub fn shipped_config() -> AnonymizerConfig {
    AnonymizerConfig {
        config_dir: shipped_config_dir(),
        ..AnonymizerConfig::default()
    }
}

/// Anonymizer over the shipped profiles
pub fn shipped_anonymizer(predictor: Arc<KeywordPredictor>) -> Anonymizer {
    Anonymizer::from_config(shipped_config(), predictor).expect("shipped config is valid")
}

/// Predictor that knows a handful of Finnish names, places and contacts
pub fn finnish_predictor() -> KeywordPredictor {
    KeywordPredictor::new()
        .with("Matti Virtanen", "person", 0.92)
        .with("Liisa Korhonen", "person", 0.88)
        .with("Helsinki", "location", 0.8)
        .with("matti.virtanen@example.fi", "email", 0.95)
        .with("040 1234567", "phone number", 0.9)
}
