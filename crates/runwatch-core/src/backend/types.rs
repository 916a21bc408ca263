use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Platform statuses that count as healthy in listings.
pub const READY_STATUSES: [&str; 2] = ["READY", "CREATED"];

/// One resource record as returned by the list endpoint.
///
/// Rows are keyed by `name`; `id` is only a server-side ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Row {
    pub fn row_id(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        READY_STATUSES.contains(&self.status.as_str())
    }
}

/// Response of the list endpoint: one page of rows plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Row>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSuggestion {
    pub name: String,
}

impl FacetSuggestion {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Suggestion endpoints backing the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Tags,
    Labels,
    Features,
}

impl FacetKind {
    pub const ALL: [FacetKind; 3] = [FacetKind::Tags, FacetKind::Labels, FacetKind::Features];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Tags => "tags",
            FacetKind::Labels => "labels",
            FacetKind::Features => "features",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
}

impl RunStatus {
    /// A terminal run will not change on later polls.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Success => "SUCCESS",
            RunStatus::Failed => "FAILED",
            RunStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Live detail record of one background task run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRunDetail {
    pub task_id: String,
    pub run_id: String,
    #[serde(default)]
    pub name: String,
    pub status: RunStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskRunDetail {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// The platform sends `null` for empty collections.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
