//! In-memory configuration store for embedding and tests

use super::{ConfigStore, Profile, RegexPattern};
use crate::domain::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Configuration store built in code
///
/// # Examples
///
/// ```
/// use text_anonymizer::anonymization::profile::{ConfigStore, InMemoryConfigStore, RegexPattern};
///
/// let store = InMemoryConfigStore::new()
///     .with_blocklist("example", ["blockword123"])
///     .with_pattern("default", RegexPattern::new("FI_HETU", r"\b\d{6}[-+A]\d{3}[0-9A-Y]\b"))
///     .with_label_mapping("FI_HETU", "HETU");
///
/// assert!(store.get_blocklist("example").unwrap().contains("blockword123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    profiles: HashMap<String, Arc<Profile>>,
    label_mappings: HashMap<String, String>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.name.clone(), Arc::new(profile));
        self
    }

    pub fn with_blocklist<I, S>(self, profile: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(profile, |p| p.blocklist.extend(terms.into_iter().map(Into::into)))
    }

    pub fn with_grantlist<I, S>(self, profile: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(profile, |p| p.grantlist.extend(terms.into_iter().map(Into::into)))
    }

    pub fn with_pattern(self, profile: &str, pattern: RegexPattern) -> Self {
        self.edit(profile, |p| p.patterns.push(pattern))
    }

    pub fn with_labels<I, S>(self, profile: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(profile, |p| {
            p.label_set = Some(labels.into_iter().map(Into::into).collect())
        })
    }

    pub fn with_label_mapping(mut self, internal: &str, display: &str) -> Self {
        self.label_mappings
            .insert(internal.to_string(), display.to_string());
        self
    }

    fn edit(mut self, profile: &str, apply: impl FnOnce(&mut Profile)) -> Self {
        let entry = self
            .profiles
            .entry(profile.to_string())
            .or_insert_with(|| Arc::new(Profile::empty(profile)));
        apply(Arc::make_mut(entry));
        self
    }

    fn profile(&self, profile: &str) -> Arc<Profile> {
        self.profiles
            .get(profile)
            .cloned()
            .unwrap_or_else(|| Arc::new(Profile::empty(profile)))
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get_blocklist(&self, profile: &str) -> Result<HashSet<String>> {
        Ok(self.profile(profile).blocklist.clone())
    }

    fn get_grantlist(&self, profile: &str) -> Result<HashSet<String>> {
        Ok(self.profile(profile).grantlist.clone())
    }

    fn get_regex_patterns(&self, profile: &str) -> Result<Vec<RegexPattern>> {
        Ok(self.profile(profile).patterns.clone())
    }

    fn get_label_mappings(&self) -> Result<HashMap<String, String>> {
        Ok(self.label_mappings.clone())
    }

    fn get_profile_labels(&self, profile: &str) -> Result<Option<Vec<String>>> {
        Ok(self.profile(profile).label_set.clone())
    }

    fn load_profile(&self, profile: &str) -> Result<Arc<Profile>> {
        Ok(self.profile(profile))
    }
}
