//! Directory-backed configuration store
//!
//! Layout under the store root:
//!
//! ```text
//! label_mappings.txt          INTERNAL_TYPE: DISPLAY
//! <profile>/blocklist.txt     one term per line
//! <profile>/grantlist.txt     one term per line
//! <profile>/regex_patterns.txt ENTITY_TYPE: pattern
//! <profile>/labels.txt        one label per line (optional)
//! ```
//!
//! Blank lines and `#` comments are ignored everywhere. Profiles that exist on
//! disk are cached for the lifetime of the store; unknown names are not.

use super::{parse_key_values, parse_term_list, ConfigStore, Profile, RegexPattern};
use crate::domain::{AnonymizerError, Result};
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const BLOCKLIST_FILE: &str = "blocklist.txt";
const GRANTLIST_FILE: &str = "grantlist.txt";
const PATTERNS_FILE: &str = "regex_patterns.txt";
const LABELS_FILE: &str = "labels.txt";
const LABEL_MAPPINGS_FILE: &str = "label_mappings.txt";

/// Configuration store reading plain text files from a directory tree
pub struct FileConfigStore {
    root: PathBuf,
    profiles: RwLock<HashMap<String, Arc<Profile>>>,
}

impl FileConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop every cached profile so the next access rereads the files
    pub fn reload(&self) -> Result<()> {
        self.profiles
            .write()
            .map_err(|_| AnonymizerError::Other("Profile cache lock poisoned".to_string()))?
            .clear();
        tracing::info!(root = %self.root.display(), "Profile cache cleared");
        Ok(())
    }

    fn cached(&self, profile: &str) -> Result<Option<Arc<Profile>>> {
        let cache = self
            .profiles
            .read()
            .map_err(|_| AnonymizerError::Other("Profile cache lock poisoned".to_string()))?;
        Ok(cache.get(profile).cloned())
    }

    /// Read a profile directory, `None` when there is nothing to read
    fn read_profile(&self, profile: &str) -> Result<Option<Profile>> {
        if !is_safe_profile_name(profile) {
            tracing::warn!(profile = %profile, "Ignoring profile with unsafe name");
            return Ok(None);
        }

        let dir = self.root.join(profile);
        if !dir.is_dir() {
            tracing::debug!(profile = %profile, "Profile directory not found, using empty profile");
            return Ok(None);
        }

        let blocklist: HashSet<String> = read_optional(&dir.join(BLOCKLIST_FILE))?
            .map(|content| parse_term_list(&content).into_iter().collect())
            .unwrap_or_default();

        let grantlist: HashSet<String> = read_optional(&dir.join(GRANTLIST_FILE))?
            .map(|content| parse_term_list(&content).into_iter().collect())
            .unwrap_or_default();

        let patterns: Vec<RegexPattern> = read_optional(&dir.join(PATTERNS_FILE))?
            .map(|content| {
                parse_key_values(&content)
                    .into_iter()
                    .map(|(entity_type, pattern)| RegexPattern::new(entity_type, pattern))
                    .collect()
            })
            .unwrap_or_default();

        let label_set = read_optional(&dir.join(LABELS_FILE))?
            .map(|content| parse_term_list(&content))
            .filter(|labels| !labels.is_empty());

        tracing::info!(
            profile = %profile,
            blocklist = blocklist.len(),
            grantlist = grantlist.len(),
            patterns = patterns.len(),
            has_labels = label_set.is_some(),
            "Loaded profile"
        );

        Ok(Some(Profile {
            name: profile.to_string(),
            blocklist,
            grantlist,
            patterns,
            label_set,
        }))
    }
}

impl ConfigStore for FileConfigStore {
    fn get_blocklist(&self, profile: &str) -> Result<HashSet<String>> {
        Ok(self.load_profile(profile)?.blocklist.clone())
    }

    fn get_grantlist(&self, profile: &str) -> Result<HashSet<String>> {
        Ok(self.load_profile(profile)?.grantlist.clone())
    }

    fn get_regex_patterns(&self, profile: &str) -> Result<Vec<RegexPattern>> {
        Ok(self.load_profile(profile)?.patterns.clone())
    }

    fn get_label_mappings(&self) -> Result<HashMap<String, String>> {
        let mappings: HashMap<String, String> = read_optional(&self.root.join(LABEL_MAPPINGS_FILE))?
            .map(|content| parse_key_values(&content).into_iter().collect())
            .unwrap_or_default();
        tracing::debug!(mappings = mappings.len(), "Loaded label mappings");
        Ok(mappings)
    }

    fn get_profile_labels(&self, profile: &str) -> Result<Option<Vec<String>>> {
        Ok(self.load_profile(profile)?.label_set.clone())
    }

    fn load_profile(&self, profile: &str) -> Result<Arc<Profile>> {
        if let Some(cached) = self.cached(profile)? {
            return Ok(cached);
        }

        let loaded = match self.read_profile(profile)? {
            Some(loaded) => Arc::new(loaded),
            None => return Ok(Arc::new(Profile::empty(profile))),
        };
        let mut cache = self
            .profiles
            .write()
            .map_err(|_| AnonymizerError::Other("Profile cache lock poisoned".to_string()))?;
        // Another caller may have loaded it meanwhile; keep the first copy
        Ok(cache
            .entry(profile.to_string())
            .or_insert(loaded)
            .clone())
    }
}

/// Read a file, treating "not found" as absent configuration
fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AnonymizerError::Profile(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn is_safe_profile_name(profile: &str) -> bool {
    !profile.is_empty()
        && profile != "."
        && !profile.contains("..")
        && !profile.contains('/')
        && !profile.contains('\\')
}
