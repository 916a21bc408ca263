use std::fmt;

use serde::Serialize;

use crate::backend::Row;
use crate::filters::FilterCriteria;

/// Sequence number of an issued list query. Only compared, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResult {
    pub rows: Vec<Row>,
    pub total_count: u64,
}

/// Which message an empty listing should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    NoData,
    NoMatchingData,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoData => "No entities found.",
            EmptyState::NoMatchingData => "No entities match the current filters.",
        }
    }
}

/// Everything the list view renders. Re-published on every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub rows: Vec<Row>,
    pub total_count: u64,
    pub loading: bool,
    pub is_filtered: bool,
    /// Criteria of the latest issued query.
    pub criteria: FilterCriteria,
    /// Set when the latest query failed; `rows` then holds the last good result.
    pub last_error: Option<String>,
}

impl ListView {
    /// The empty-state variant, or `None` while loading or when rows exist.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading || !self.rows.is_empty() {
            return None;
        }
        Some(if self.is_filtered {
            EmptyState::NoMatchingData
        } else {
            EmptyState::NoData
        })
    }

    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.row_id() == row_id)
    }
}

/// Request from the list to open a resource's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub row_id: String,
    pub path: String,
}

impl NavigationRequest {
    pub fn for_row(row: &Row) -> Self {
        Self {
            row_id: row.row_id().to_string(),
            path: format!("/entities/{}", row.name),
        }
    }
}
