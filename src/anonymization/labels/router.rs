//! Routing of requested labels by suffix convention
//!
//! - `phone_number_ner` → predictor label `phone number`
//! - `fi_hetu_regex` → pattern entity type `FI_HETU`
//! - bare `phone_number` → predictor label `phone number`
//! - `blocklist` → enables blocklist matching

use std::collections::HashSet;

/// Label token that enables blocklist matching
pub const BLOCKLIST_TOKEN: &str = "blocklist";

const NER_SUFFIX: &str = "_ner";
const REGEX_SUFFIX: &str = "_regex";

/// Requested labels split by destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRoute {
    /// Labels handed to the predictor, in request order, without duplicates
    pub model_labels: Vec<String>,
    /// Pattern entity types to apply; `None` means every configured pattern
    pub pattern_types: Option<HashSet<String>>,
    /// Whether the `blocklist` token was present
    pub blocklist_requested: bool,
}

impl LabelRoute {
    /// Check whether a pattern entity type passes the restriction
    pub fn allows_pattern(&self, entity_type: &str) -> bool {
        self.pattern_types
            .as_ref()
            .map_or(true, |types| types.contains(entity_type))
    }
}

/// Classifies requested labels
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRouter;

impl LabelRouter {
    pub fn new() -> Self {
        Self
    }

    /// Route a flat label list
    ///
    /// `pattern_types` stays `None` unless at least one `*_regex` label is
    /// present; absence of regex labels means "apply the full pattern set".
    pub fn route<S: AsRef<str>>(&self, labels: &[S]) -> LabelRoute {
        let mut route = LabelRoute::default();
        let mut pattern_types = HashSet::new();

        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }

            if label == BLOCKLIST_TOKEN {
                route.blocklist_requested = true;
            } else if let Some(stem) = label.strip_suffix(REGEX_SUFFIX) {
                pattern_types.insert(stem.to_uppercase());
            } else {
                let stem = label.strip_suffix(NER_SUFFIX).unwrap_or(label);
                let model_label = stem.replace('_', " ");
                if !route.model_labels.contains(&model_label) {
                    route.model_labels.push(model_label);
                }
            }
        }

        if !pattern_types.is_empty() {
            route.pattern_types = Some(pattern_types);
        }

        route
    }
}
