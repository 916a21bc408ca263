use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Statuses,
    Tags,
    Labels,
    Features,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Statuses, Facet::Tags, Facet::Labels, Facet::Features];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Statuses => "statuses",
            Facet::Tags => "tags",
            Facet::Labels => "labels",
            Facet::Features => "features",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's complete search, filter and pagination intent.
///
/// Immutable: every `with_*` method returns a fresh value and leaves `self`
/// untouched. Facet sets are owned per snapshot, so no two snapshots share
/// (and can corrupt) the same collection.
///
/// Serialized field names follow the platform's list-query payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "SearchTxt")]
    search_text: String,
    #[serde(rename = "Statuses")]
    statuses: BTreeSet<String>,
    #[serde(rename = "Tags")]
    tags: BTreeSet<String>,
    #[serde(rename = "Labels")]
    labels: BTreeSet<String>,
    #[serde(rename = "Features")]
    features: BTreeSet<String>,
    #[serde(rename = "pageSize")]
    page_size: NonZeroU32,
    /// Zero-based page index.
    offset: u64,
}

impl FilterCriteria {
    pub fn with_page_size(page_size: NonZeroU32) -> Self {
        Self {
            search_text: String::new(),
            statuses: BTreeSet::new(),
            tags: BTreeSet::new(),
            labels: BTreeSet::new(),
            features: BTreeSet::new(),
            page_size,
            offset: 0,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn facet(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Statuses => &self.statuses,
            Facet::Tags => &self.tags,
            Facet::Labels => &self.labels,
            Facet::Features => &self.features,
        }
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Replace the search text. A new search invalidates the page cursor.
    pub fn with_search_text(&self, text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            offset: 0,
            ..self.clone()
        }
    }

    /// Add `value` to the facet set if absent, remove it if present.
    /// The page cursor is kept.
    pub fn with_toggled(&self, facet: Facet, value: &str) -> Self {
        let mut next = self.clone();
        let set = next.facet_mut(facet);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        next
    }

    /// Replace the page index, clamping negative input to 0.
    pub fn with_offset(&self, page: i64) -> Self {
        Self {
            offset: u64::try_from(page).unwrap_or(0),
            ..self.clone()
        }
    }

    fn facet_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Statuses => &mut self.statuses,
            Facet::Tags => &mut self.tags,
            Facet::Labels => &mut self.labels,
            Facet::Features => &mut self.features,
        }
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}
