//! Internal entity type to display label mapping

use std::collections::HashMap;

/// Normalize a raw label: upper-case, spaces to underscores
///
/// `phone number` → `PHONE_NUMBER`, `FI_HETU` stays as is.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase().replace(' ', "_")
}

/// Read-only display label table
#[derive(Debug, Clone, Default)]
pub struct LabelMapper {
    mappings: HashMap<String, String>,
}

impl LabelMapper {
    /// Build from a table keyed by internal type; keys are normalized
    pub fn new(mappings: HashMap<String, String>) -> Self {
        let mappings = mappings
            .into_iter()
            .map(|(key, value)| (normalize_label(&key), value))
            .collect();
        Self { mappings }
    }

    /// Map a raw label to its display label, falling back to the normalized form
    pub fn map(&self, label: &str) -> String {
        let normalized = normalize_label(label);
        match self.mappings.get(&normalized) {
            Some(display) => display.clone(),
            None => normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
