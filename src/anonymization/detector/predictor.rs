//! Learned entity predictor seam and its chunked, multi-pass driver

use super::EntitySource;
use crate::anonymization::chunker::{Chunk, Chunker};
use crate::anonymization::labels::normalize_label;
use crate::anonymization::models::{Candidate, PredictedEntity, Span};
use crate::domain::{AnonymizerError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;

/// External entity recognition capability
///
/// Offsets in the returned entities are byte offsets local to `text`.
/// Implementations that cannot serve concurrent calls must serialize
/// internally.
#[async_trait]
pub trait EntityPredictor: Send + Sync {
    async fn predict(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> anyhow::Result<Vec<PredictedEntity>>;
}

/// One predictor invocation shape: a label set at a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPass {
    pub labels: Vec<String>,
    pub threshold: f32,
}

/// Decide how the predictor is called for a set of model labels
///
/// Sharing a call between the address label and other labels shifts the
/// predictor's address scores (a positional-encoding artifact of the model),
/// so when both are requested the address label gets its own pass at a
/// slightly lower threshold, never below `address_floor`.
pub fn plan_passes(
    model_labels: &[String],
    threshold: f32,
    address_labels: &[String],
    address_floor: f32,
) -> Vec<PredictionPass> {
    if model_labels.is_empty() {
        return Vec::new();
    }

    let address_keys: Vec<String> = address_labels.iter().map(|l| normalize_label(l)).collect();
    let (address, others): (Vec<String>, Vec<String>) = model_labels
        .iter()
        .cloned()
        .partition(|label| address_keys.contains(&normalize_label(label)));

    if address.is_empty() || others.is_empty() {
        return vec![PredictionPass {
            labels: model_labels.to_vec(),
            threshold,
        }];
    }

    vec![
        PredictionPass {
            labels: address,
            threshold: address_floor.max(threshold - 0.1),
        },
        PredictionPass {
            labels: others,
            threshold,
        },
    ]
}

/// Runs the predictor over every chunk and pass and merges the output
pub struct PredictorSource {
    predictor: Arc<dyn EntityPredictor>,
    chunker: Chunker,
    passes: Vec<PredictionPass>,
    max_concurrency: usize,
}

impl PredictorSource {
    pub fn new(
        predictor: Arc<dyn EntityPredictor>,
        chunker: Chunker,
        passes: Vec<PredictionPass>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            predictor,
            chunker,
            passes,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn passes(&self) -> &[PredictionPass] {
        &self.passes
    }

    /// Translate one chunk's entities to document offsets, dropping bad spans
    fn globalize(text: &str, chunk: &Chunk<'_>, entities: Vec<PredictedEntity>) -> Vec<Candidate> {
        entities
            .into_iter()
            .filter_map(|entity| {
                let local = Span::new(entity.start, entity.end);
                if !local.fits(chunk.text) {
                    tracing::warn!(
                        start = entity.start,
                        end = entity.end,
                        chunk_offset = chunk.offset,
                        label = %entity.label,
                        "Dropping predictor span outside chunk bounds"
                    );
                    return None;
                }
                let global = local.shifted(chunk.offset);
                Some(Candidate::predicted(
                    global,
                    entity.label,
                    entity.score,
                    &text[global.start..global.end],
                ))
            })
            .collect()
    }
}

#[async_trait]
impl EntitySource for PredictorSource {
    fn name(&self) -> &'static str {
        "predictor"
    }

    async fn find(&self, text: &str) -> Result<Vec<Candidate>> {
        if self.passes.is_empty() || text.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = self.chunker.split(text);
        let jobs: Vec<(usize, &Chunk<'_>, &PredictionPass)> = chunks
            .iter()
            .enumerate()
            .flat_map(|(index, chunk)| self.passes.iter().map(move |pass| (index, chunk, pass)))
            .collect();
        let total_jobs = jobs.len();

        let calls: Vec<_> = jobs
            .into_iter()
            .map(|(index, chunk, pass)| {
                let predictor = Arc::clone(&self.predictor);
                async move {
                    let outcome = predictor
                        .predict(chunk.text, &pass.labels, pass.threshold)
                        .await;
                    (index, chunk, outcome)
                }
            })
            .collect();

        let outcomes: Vec<_> = stream::iter(calls)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut merged: HashMap<(usize, usize, String), Candidate> = HashMap::new();
        let mut failures = 0;
        let mut last_error: Option<anyhow::Error> = None;

        for (index, chunk, outcome) in outcomes {
            match outcome {
                Ok(entities) => {
                    for candidate in Self::globalize(text, chunk, entities) {
                        let key = (candidate.start(), candidate.end(), candidate.label.clone());
                        match merged.get_mut(&key) {
                            Some(existing) if existing.score >= candidate.score => {}
                            Some(existing) => *existing = candidate,
                            None => {
                                merged.insert(key, candidate);
                            }
                        }
                    }
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        chunk = index,
                        chunk_offset = chunk.offset,
                        error = %e,
                        "Predictor failed on chunk, continuing with remaining chunks"
                    );
                    last_error = Some(e);
                }
            }
        }

        if failures == total_jobs {
            let message = format!("all {total_jobs} predictor calls failed");
            return Err(match last_error {
                Some(e) => AnonymizerError::from(e.context(message)),
                None => AnonymizerError::Predictor(message),
            });
        }

        let mut candidates: Vec<Candidate> = merged.into_values().collect();
        candidates.sort_by(|a, b| a.span.cmp(&b.span).then_with(|| a.label.cmp(&b.label)));

        tracing::debug!(
            chunks = chunks.len(),
            passes = self.passes.len(),
            failures,
            candidates = candidates.len(),
            "Predictor pass complete"
        );

        Ok(candidates)
    }
}
