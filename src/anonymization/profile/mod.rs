//! Profiles and the configuration store seam
//!
//! A profile bundles a blocklist, a grantlist, regex patterns and an optional
//! label set. A missing profile is not an error: it yields empty collections.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileConfigStore;
pub use memory_store::InMemoryConfigStore;

use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Profile used when the caller names none
pub const DEFAULT_PROFILE: &str = "default";

/// One `ENTITY_TYPE: pattern` definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexPattern {
    pub entity_type: String,
    pub pattern: String,
}

impl RegexPattern {
    pub fn new(entity_type: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            pattern: pattern.into(),
        }
    }
}

/// Named bundle of list and pattern configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: String,
    /// Terms always redacted as `MUU_TUNNISTE`
    pub blocklist: HashSet<String>,
    /// Terms never redacted
    pub grantlist: HashSet<String>,
    pub patterns: Vec<RegexPattern>,
    /// Labels to use when the call gives none
    pub label_set: Option<Vec<String>>,
}

impl Profile {
    /// Empty profile, what a missing profile resolves to
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Source of profile and label mapping data
///
/// Implementations return empty collections for unknown profiles and only
/// fail when existing configuration cannot be read.
pub trait ConfigStore: Send + Sync {
    fn get_blocklist(&self, profile: &str) -> Result<HashSet<String>>;

    fn get_grantlist(&self, profile: &str) -> Result<HashSet<String>>;

    fn get_regex_patterns(&self, profile: &str) -> Result<Vec<RegexPattern>>;

    /// Internal type (`UPPER_SNAKE_CASE`) to display label
    fn get_label_mappings(&self) -> Result<HashMap<String, String>>;

    /// Profile-specific label set, `None` when the profile defines none
    fn get_profile_labels(&self, profile: &str) -> Result<Option<Vec<String>>>;

    /// Assemble the whole profile
    fn load_profile(&self, profile: &str) -> Result<Arc<Profile>> {
        Ok(Arc::new(Profile {
            name: profile.to_string(),
            blocklist: self.get_blocklist(profile)?,
            grantlist: self.get_grantlist(profile)?,
            patterns: self.get_regex_patterns(profile)?,
            label_set: self.get_profile_labels(profile)?,
        }))
    }
}

/// Parse a one-term-per-line list, skipping blanks and `#` comments
pub(crate) fn parse_term_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Parse `KEY: value` lines, splitting at the first colon
pub(crate) fn parse_key_values(content: &str) -> Vec<(String, String)> {
    parse_term_list(content)
        .into_iter()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                tracing::warn!(line = %line, "Skipping malformed configuration line");
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term_list_skips_comments_and_blanks() {
        let terms = parse_term_list("# comment\n\n  blockword123  \nSalainen\n");
        assert_eq!(terms, vec!["blockword123", "Salainen"]);
    }

    #[test]
    fn test_parse_key_values_splits_at_first_colon() {
        let pairs = parse_key_values("FI_HETU: \\b\\d{6}(?:[-+A])\\d{3}\\w\\b\nbroken line\n: x\n");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "FI_HETU");
        assert_eq!(pairs[0].1, "\\b\\d{6}(?:[-+A])\\d{3}\\w\\b");
    }
}
