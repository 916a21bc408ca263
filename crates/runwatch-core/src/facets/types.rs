use std::collections::BTreeSet;

use serde::Serialize;

use crate::backend::{FacetKind, FacetSuggestion};

/// Maximum suggestions shown per facet in the filter panel.
pub const DEFAULT_FACET_LIMIT: usize = 8;

/// Suggestion lists for the filter panel, each capped at the loader's limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetLists {
    pub tags: Vec<FacetSuggestion>,
    pub labels: Vec<String>,
    pub features: Vec<String>,
}

impl FacetLists {
    /// Replace one slot with the first `limit` suggestions, leaving the others.
    pub fn set(&mut self, kind: FacetKind, suggestions: &[FacetSuggestion], limit: usize) {
        let capped = suggestions.iter().take(limit);
        match kind {
            FacetKind::Tags => self.tags = capped.cloned().collect(),
            FacetKind::Labels => self.labels = capped.map(|s| s.name.clone()).collect(),
            FacetKind::Features => self.features = capped.map(|s| s.name.clone()).collect(),
        }
    }

    pub fn len(&self, kind: FacetKind) -> usize {
        match kind {
            FacetKind::Tags => self.tags.len(),
            FacetKind::Labels => self.labels.len(),
            FacetKind::Features => self.features.len(),
        }
    }
}

/// What the loader publishes: the lists plus the fetches still outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSnapshot {
    pub lists: FacetLists,
    pub pending: BTreeSet<FacetKind>,
}

impl FacetSnapshot {
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}
