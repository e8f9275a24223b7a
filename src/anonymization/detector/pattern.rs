//! Regex pattern matching from a profile's pattern set

use super::EntitySource;
use crate::anonymization::labels::LabelRoute;
use crate::anonymization::models::{Candidate, SourceKind, Span};
use crate::anonymization::profile::RegexPattern;
use crate::domain::Result;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Compiled pattern with its entity type
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub entity_type: String,
    pub regex: Regex,
}

/// Compiled pattern set of one profile
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl PatternMatcher {
    /// Compile a profile's patterns
    ///
    /// A pattern that fails to compile is logged and skipped; the rest stay usable.
    pub fn compile(patterns: &[RegexPattern]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|def| match Regex::new(&def.pattern) {
                Ok(regex) => Some(CompiledPattern {
                    entity_type: def.entity_type.clone(),
                    regex,
                }),
                Err(e) => {
                    tracing::warn!(
                        entity_type = %def.entity_type,
                        error = %e,
                        "Skipping invalid regex pattern"
                    );
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Run the patterns whose entity type passes `allows`
    pub fn find(&self, text: &str, allows: impl Fn(&str) -> bool) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for pattern in self.patterns.iter().filter(|p| allows(&p.entity_type)) {
            for matched in pattern.regex.find_iter(text) {
                if matched.is_empty() {
                    continue;
                }
                candidates.push(Candidate::deterministic(
                    Span::new(matched.start(), matched.end()),
                    pattern.entity_type.clone(),
                    matched.as_str(),
                    SourceKind::Pattern,
                ));
            }
        }

        candidates
    }
}

/// Pattern matcher bound to one call's label route
pub struct PatternSource {
    matcher: Arc<PatternMatcher>,
    route: LabelRoute,
}

impl PatternSource {
    pub fn new(matcher: Arc<PatternMatcher>, route: LabelRoute) -> Self {
        Self { matcher, route }
    }
}

#[async_trait]
impl EntitySource for PatternSource {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn find(&self, text: &str) -> Result<Vec<Candidate>> {
        Ok(self
            .matcher
            .find(text, |entity_type| self.route.allows_pattern(entity_type)))
    }
}
