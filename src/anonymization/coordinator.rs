//! Gathering candidates from every entity source for one call
//!
//! The coordinator decides which labels are active, which sources run and
//! which profile supplies patterns and lists. It composes sources through the
//! [`EntitySource`] trait and returns the unresolved candidate list.
//!
//! The effective profile's grantlist always applies. Its blocklist applies
//! only when the caller names a profile or requests the `blocklist` label.

use crate::anonymization::chunker::Chunker;
use crate::anonymization::config::AnonymizerConfig;
use crate::anonymization::detector::{
    plan_passes, BlocklistSource, EntityPredictor, EntitySource, ListMatcher, PatternMatcher,
    PatternSource, PredictorSource,
};
use crate::anonymization::labels::{LabelRoute, LabelRouter};
use crate::anonymization::models::Candidate;
use crate::anonymization::profile::{ConfigStore, Profile, DEFAULT_PROFILE};
use crate::domain::{AnonymizerError, Result};
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Matchers compiled from one profile instance
struct CompiledProfile {
    profile: Arc<Profile>,
    patterns: Arc<PatternMatcher>,
    blocklist: Arc<ListMatcher>,
}

type MatcherCache = HashMap<String, CompiledProfile>;

/// Unresolved output of one detection run
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Candidates from all sources, before grantlist filtering
    pub candidates: Vec<Candidate>,
    /// Terms to protect, from the effective profile
    pub grantlist: HashSet<String>,
    /// Profile that supplied patterns and lists
    pub profile: String,
    /// Whether the blocklist source ran
    pub blocklist_enabled: bool,
}

/// Composes predictor, pattern and blocklist sources
pub struct EntitySourceCoordinator {
    predictor: Arc<dyn EntityPredictor>,
    store: Arc<dyn ConfigStore>,
    router: LabelRouter,
    chunker: Chunker,
    default_labels: Vec<String>,
    address_labels: Vec<String>,
    address_threshold_floor: f32,
    max_concurrency: usize,
    compiled: RwLock<MatcherCache>,
}

impl EntitySourceCoordinator {
    pub fn new(
        predictor: Arc<dyn EntityPredictor>,
        store: Arc<dyn ConfigStore>,
        config: &AnonymizerConfig,
    ) -> Self {
        Self {
            predictor,
            store,
            router: LabelRouter::new(),
            chunker: Chunker::new(config.chunking.clone()),
            default_labels: config.default_labels.clone(),
            address_labels: config.address_labels.clone(),
            address_threshold_floor: config.address_threshold_floor,
            max_concurrency: config.max_concurrency,
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Labels in effect: call labels, then the profile's set, then defaults
    pub fn active_labels(&self, requested: Option<&[String]>, profile: &Profile) -> Vec<String> {
        if let Some(labels) = requested.filter(|labels| !labels.is_empty()) {
            return labels.to_vec();
        }
        if let Some(labels) = profile.label_set.as_ref().filter(|labels| !labels.is_empty()) {
            return labels.clone();
        }
        self.default_labels.clone()
    }

    /// Run every applicable source over `text`
    ///
    /// A profile named by the caller, or the `blocklist` label token, turns on
    /// blocklist matching. Grantlist protection is always on.
    pub async fn detect(
        &self,
        text: &str,
        labels: Option<&[String]>,
        profile: Option<&str>,
        threshold: f32,
    ) -> Result<Detection> {
        let explicit_profile = profile.map(str::trim).filter(|name| !name.is_empty());
        let profile_name = explicit_profile.unwrap_or(DEFAULT_PROFILE);
        let profile = self.store.load_profile(profile_name)?;

        let active = self.active_labels(labels, &profile);
        let route = self.router.route(&active);
        let blocklist_enabled = explicit_profile.is_some() || route.blocklist_requested;

        let sources = self.build_sources(&route, &profile, blocklist_enabled, threshold)?;
        let names: Vec<&'static str> = sources.iter().map(|source| source.name()).collect();

        let found = try_join_all(sources.iter().map(|source| source.find(text))).await?;
        let candidates: Vec<Candidate> = found.into_iter().flatten().collect();

        tracing::debug!(
            profile = %profile_name,
            model_labels = route.model_labels.len(),
            sources = ?names,
            blocklist_enabled,
            candidates = candidates.len(),
            "Collected candidates"
        );

        Ok(Detection {
            candidates,
            grantlist: profile.grantlist.clone(),
            profile: profile_name.to_string(),
            blocklist_enabled,
        })
    }

    fn build_sources(
        &self,
        route: &LabelRoute,
        profile: &Arc<Profile>,
        blocklist_enabled: bool,
        threshold: f32,
    ) -> Result<Vec<Box<dyn EntitySource>>> {
        let mut sources: Vec<Box<dyn EntitySource>> = Vec::new();

        if !route.model_labels.is_empty() {
            let passes = plan_passes(
                &route.model_labels,
                threshold,
                &self.address_labels,
                self.address_threshold_floor,
            );
            sources.push(Box::new(PredictorSource::new(
                Arc::clone(&self.predictor),
                self.chunker.clone(),
                passes,
                self.max_concurrency,
            )));
        }

        let (patterns, blocklist) = self.matchers(profile)?;
        if !patterns.is_empty() {
            sources.push(Box::new(PatternSource::new(patterns, route.clone())));
        }

        if blocklist_enabled && !blocklist.is_empty() {
            sources.push(Box::new(BlocklistSource::new(blocklist)));
        }

        Ok(sources)
    }

    /// Compiled patterns and blocklist for a profile, recompiled only when the
    /// store hands out a different profile instance
    ///
    /// Profiles with neither patterns nor blocklist terms are not cached, so
    /// unknown profile names leave no trace.
    fn matchers(&self, profile: &Arc<Profile>) -> Result<(Arc<PatternMatcher>, Arc<ListMatcher>)> {
        {
            let cache = self
                .compiled
                .read()
                .map_err(|_| AnonymizerError::Other("Matcher cache lock poisoned".to_string()))?;
            if let Some(entry) = cache.get(&profile.name) {
                if Arc::ptr_eq(&entry.profile, profile) {
                    return Ok((Arc::clone(&entry.patterns), Arc::clone(&entry.blocklist)));
                }
            }
        }

        let patterns = Arc::new(PatternMatcher::compile(&profile.patterns));
        let blocklist = Arc::new(ListMatcher::new(&profile.blocklist));
        if patterns.is_empty() && blocklist.is_empty() {
            return Ok((patterns, blocklist));
        }

        tracing::debug!(
            profile = %profile.name,
            patterns = patterns.len(),
            blocklist = profile.blocklist.len(),
            "Compiled profile matchers"
        );

        self.compiled
            .write()
            .map_err(|_| AnonymizerError::Other("Matcher cache lock poisoned".to_string()))?
            .insert(
                profile.name.clone(),
                CompiledProfile {
                    profile: Arc::clone(profile),
                    patterns: Arc::clone(&patterns),
                    blocklist: Arc::clone(&blocklist),
                },
            );

        Ok((patterns, blocklist))
    }
}
