//! Rewriting text from the resolved span set

use crate::anonymization::labels::LabelMapper;
use crate::anonymization::models::{AnonymizerResult, Candidate, ResolvedEntity};

/// Replaces resolved spans with `<DISPLAY_LABEL>` tags
pub struct Redactor<'a> {
    mapper: &'a LabelMapper,
}

impl<'a> Redactor<'a> {
    pub fn new(mapper: &'a LabelMapper) -> Self {
        Self { mapper }
    }

    /// Tag used in place of an entity
    pub fn tag(display_label: &str) -> String {
        format!("<{display_label}>")
    }

    /// Redact `text` and collect statistics
    ///
    /// `resolved` must be non-overlapping. Spans are replaced from the end of
    /// the text backwards so earlier offsets stay valid.
    pub fn redact(&self, text: &str, resolved: &[Candidate]) -> AnonymizerResult {
        let mut result = AnonymizerResult::empty();
        let mut entities: Vec<ResolvedEntity> = resolved
            .iter()
            .filter(|candidate| {
                let fits = candidate.span.fits(text);
                if !fits {
                    tracing::warn!(
                        start = candidate.start(),
                        end = candidate.end(),
                        label = %candidate.label,
                        "Skipping entity outside text bounds"
                    );
                }
                fits
            })
            .map(|candidate| ResolvedEntity {
                start: candidate.start(),
                end: candidate.end(),
                label: candidate.label.clone(),
                display_label: self.mapper.map(&candidate.label),
                score: candidate.score,
                source: candidate.source,
                text: text[candidate.start()..candidate.end()].to_string(),
            })
            .collect();
        entities.sort_by_key(|entity| entity.start);

        let mut redacted = text.to_string();
        for entity in entities.iter().rev() {
            redacted.replace_range(entity.start..entity.end, &Self::tag(&entity.display_label));
        }

        for entity in &entities {
            result.record(&entity.display_label, &entity.text);
        }

        result.anonymized_text = Some(redacted);
        result.entities = entities;
        result
    }
}
