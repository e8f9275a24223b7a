//! Reducing overlapping candidates to one consistent span set

use crate::anonymization::config::AnonymizerConfig;
use crate::anonymization::labels::normalize_label;
use crate::anonymization::models::Candidate;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Raise the score of address candidates that overlap a person candidate
///
/// Finnish street names often contain surnames, which pulls the predictor
/// toward a person reading of an address. Scores are capped at 1.0. A boost of
/// zero returns the input unchanged.
pub fn boost_address_scores(
    candidates: Vec<Candidate>,
    boost: f32,
    address_labels: &HashSet<String>,
    person_labels: &HashSet<String>,
) -> Vec<Candidate> {
    if boost <= 0.0 {
        return candidates;
    }

    let person_spans: Vec<_> = candidates
        .iter()
        .filter(|c| person_labels.contains(&normalize_label(&c.label)))
        .map(|c| c.span)
        .collect();

    if person_spans.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .map(|mut candidate| {
            if address_labels.contains(&normalize_label(&candidate.label))
                && person_spans.iter().any(|span| span.overlaps(&candidate.span))
            {
                candidate.score = (candidate.score + boost).min(1.0);
            }
            candidate
        })
        .collect()
}

fn normalized_set<S: AsRef<str>>(labels: &[S]) -> HashSet<String> {
    labels.iter().map(|l| normalize_label(l.as_ref())).collect()
}

/// Resolution order: earlier start, deterministic first, longer, higher score
fn priority(a: &Candidate, b: &Candidate) -> Ordering {
    let tier = |c: &Candidate| if c.is_deterministic() { 0u8 } else { 1u8 };

    a.start()
        .cmp(&b.start())
        .then_with(|| tier(a).cmp(&tier(b)))
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.label.cmp(&b.label))
}

/// Greedy sweep keeping each candidate that starts at or after the last kept end
///
/// Output is non-overlapping and in ascending start order.
pub fn select_non_overlapping(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(priority);

    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut last_end = 0;

    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        if candidate.start() >= last_end {
            last_end = candidate.end();
            kept.push(candidate);
        }
    }

    kept
}

/// Overlap resolver with the address boost applied ahead of the sweep
#[derive(Debug, Clone)]
pub struct OverlapResolver {
    boost: f32,
    address_labels: HashSet<String>,
    person_labels: HashSet<String>,
}

impl OverlapResolver {
    pub fn new<S: AsRef<str>>(boost: f32, address_labels: &[S], person_labels: &[S]) -> Self {
        Self {
            boost,
            address_labels: normalized_set(address_labels),
            person_labels: normalized_set(person_labels),
        }
    }

    pub fn from_config(config: &AnonymizerConfig) -> Self {
        Self::new(
            config.address_boost,
            config.address_labels.as_slice(),
            config.person_labels.as_slice(),
        )
    }

    pub fn resolve(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let total = candidates.len();
        let boosted =
            boost_address_scores(candidates, self.boost, &self.address_labels, &self.person_labels);
        let resolved = select_non_overlapping(boosted);
        tracing::debug!(candidates = total, resolved = resolved.len(), "Resolved overlaps");
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{SourceKind, Span};

    fn predicted(start: usize, end: usize, label: &str, score: f32) -> Candidate {
        Candidate::predicted(Span::new(start, end), label, score, "x".repeat(end - start))
    }

    fn pattern(start: usize, end: usize, label: &str) -> Candidate {
        Candidate::deterministic(
            Span::new(start, end),
            label,
            "x".repeat(end - start),
            SourceKind::Pattern,
        )
    }

    fn resolver(boost: f32) -> OverlapResolver {
        OverlapResolver::new(boost, &["address"], &["person"])
    }

    fn assert_disjoint(resolved: &[Candidate]) {
        for pair in resolved.windows(2) {
            assert!(pair[0].end() <= pair[1].start(), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_deterministic_wins_at_same_start() {
        let resolved = resolver(0.0).resolve(vec![
            predicted(0, 20, "phone number", 0.99),
            pattern(0, 11, "FI_HETU"),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].label, "FI_HETU");
    }

    #[test]
    fn test_longer_span_wins_within_tier() {
        let resolved = resolver(0.0).resolve(vec![
            predicted(5, 10, "person", 0.95),
            predicted(5, 15, "person", 0.7),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].end(), 15);
    }

    #[test]
    fn test_higher_score_breaks_ties() {
        let resolved = resolver(0.0).resolve(vec![
            predicted(0, 5, "location", 0.6),
            predicted(0, 5, "person", 0.8),
        ]);
        assert_eq!(resolved[0].label, "person");
    }

    #[test]
    fn test_earlier_start_wins_regardless_of_source() {
        let resolved = resolver(0.0).resolve(vec![
            pattern(3, 12, "FI_REKISTERI"),
            predicted(0, 6, "person", 0.5),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].label, "person");
    }

    #[test]
    fn test_adjacent_spans_both_kept() {
        let resolved = resolver(0.0).resolve(vec![
            predicted(5, 10, "person", 0.9),
            predicted(0, 5, "person", 0.9),
        ]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].start(), 0);
        assert_disjoint(&resolved);
    }

    #[test]
    fn test_output_never_overlaps() {
        let resolved = resolver(0.15).resolve(vec![
            predicted(0, 8, "person", 0.7),
            predicted(2, 20, "address", 0.6),
            pattern(15, 26, "FI_HETU"),
            predicted(19, 30, "email", 0.9),
            predicted(30, 34, "person", 0.4),
            pattern(31, 33, "IBAN"),
        ]);
        assert_disjoint(&resolved);
    }

    #[test]
    fn test_boost_applies_only_to_overlapping_address() {
        let candidates = vec![
            predicted(0, 20, "address", 0.5),
            predicted(0, 8, "person", 0.7),
            predicted(30, 40, "address", 0.5),
        ];
        let boosted = boost_address_scores(
            candidates,
            0.15,
            &HashSet::from(["ADDRESS".to_string()]),
            &HashSet::from(["PERSON".to_string()]),
        );
        assert!((boosted[0].score - 0.65).abs() < 1e-6);
        assert_eq!(boosted[1].score, 0.7);
        assert_eq!(boosted[2].score, 0.5);
    }

    #[test]
    fn test_boost_is_capped() {
        let boosted = boost_address_scores(
            vec![predicted(0, 20, "address", 0.95), predicted(3, 9, "person", 0.9)],
            0.15,
            &HashSet::from(["ADDRESS".to_string()]),
            &HashSet::from(["PERSON".to_string()]),
        );
        assert_eq!(boosted[0].score, 1.0);
    }

    #[test]
    fn test_boost_flips_address_over_person_at_same_span() {
        let candidates = vec![
            predicted(0, 17, "person", 0.7),
            predicted(0, 17, "address", 0.6),
        ];
        assert_eq!(resolver(0.0).resolve(candidates.clone())[0].label, "person");
        assert_eq!(resolver(0.15).resolve(candidates)[0].label, "address");
    }

    #[test]
    fn test_empty_input() {
        assert!(resolver(0.15).resolve(Vec::new()).is_empty());
    }
}
