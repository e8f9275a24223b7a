//! Blocklist and grantlist matching

use super::EntitySource;
use crate::anonymization::models::{Candidate, SourceKind, Span};
use crate::domain::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Label given to every blocklist match
pub const BLOCKLIST_LABEL: &str = "MUU_TUNNISTE";

/// Whole-word, case-insensitive blocklist matcher
#[derive(Debug, Clone, Default)]
pub struct ListMatcher {
    terms: Vec<Regex>,
}

impl ListMatcher {
    /// Compile one word-bounded matcher per blocklist term
    pub fn new(blocklist: &HashSet<String>) -> Self {
        let mut sorted: Vec<&String> = blocklist
            .iter()
            .filter(|term| !term.trim().is_empty())
            .collect();
        sorted.sort();

        let terms = sorted
            .into_iter()
            .filter_map(|term| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(term.trim()));
                match Regex::new(&pattern) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping blocklist term that cannot be compiled");
                        None
                    }
                }
            })
            .collect();

        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Find every blocklist occurrence as a `MUU_TUNNISTE` candidate
    pub fn find_blocklist(&self, text: &str) -> Vec<Candidate> {
        self.terms
            .iter()
            .flat_map(|regex| regex.find_iter(text))
            .filter(|matched| !matched.is_empty())
            .map(|matched| {
                Candidate::deterministic(
                    Span::new(matched.start(), matched.end()),
                    BLOCKLIST_LABEL,
                    matched.as_str(),
                    SourceKind::List,
                )
            })
            .collect()
    }

    /// Drop candidates whose text equals a grantlist term, ignoring case
    ///
    /// Applies to candidates from every source.
    pub fn filter_grantlist(candidates: Vec<Candidate>, grantlist: &HashSet<String>) -> Vec<Candidate> {
        if grantlist.is_empty() {
            return candidates;
        }

        let protected: HashSet<String> = grantlist
            .iter()
            .map(|term| term.trim().to_lowercase())
            .collect();

        candidates
            .into_iter()
            .filter(|candidate| {
                let keep = !protected.contains(&candidate.text.to_lowercase());
                if !keep {
                    tracing::debug!(label = %candidate.label, "Protecting grantlisted entity");
                }
                keep
            })
            .collect()
    }
}

/// Blocklist matcher exposed as an entity source
pub struct BlocklistSource {
    matcher: Arc<ListMatcher>,
}

impl BlocklistSource {
    pub fn new(matcher: Arc<ListMatcher>) -> Self {
        Self { matcher }
    }
}

#[async_trait]
impl EntitySource for BlocklistSource {
    fn name(&self) -> &'static str {
        "blocklist"
    }

    async fn find(&self, text: &str) -> Result<Vec<Candidate>> {
        Ok(self.matcher.find_blocklist(text))
    }
}
