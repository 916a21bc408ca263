//! In-process backend answering from a JSON snapshot of platform data.
//!
//! The document layout is:
//!
//! ```json
//! {
//!   "entities": [{ "name": "user", "status": "READY", "tags": ["prod"] }],
//!   "tags": [{ "name": "prod" }],
//!   "labels": [{ "name": "is_fraud" }],
//!   "features": [{ "name": "avg_transactions" }],
//!   "task_runs": [{ "task_id": "1", "run_id": "1", "status": "RUNNING" }]
//! }
//! ```
//!
//! When loaded from a file, task run lookups re-read the file on every call
//! so an external writer can advance a run while it is being watched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::errors::{BackendError, FixtureError};
use super::traits::DashboardApi;
use super::types::{FacetKind, FacetSuggestion, ListPage, Row, TaskRunDetail};
use crate::filters::{Facet, FilterCriteria};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub entities: Vec<Row>,
    #[serde(default)]
    pub tags: Vec<FacetSuggestion>,
    #[serde(default)]
    pub labels: Vec<FacetSuggestion>,
    #[serde(default)]
    pub features: Vec<FacetSuggestion>,
    #[serde(default)]
    pub task_runs: Vec<TaskRunDetail>,
}

impl FixtureData {
    pub fn parse(path: &str, content: &str) -> Result<Self, FixtureError> {
        serde_json::from_str(content).map_err(|source| FixtureError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Apply `filters` the way the platform's list endpoint does.
    pub fn query(&self, filters: &FilterCriteria) -> ListPage {
        let matching: Vec<&Row> = self
            .entities
            .iter()
            .filter(|row| matches_filters(row, filters))
            .collect();

        let page_size = filters.page_size().get() as usize;
        let start = usize::try_from(filters.offset())
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size);

        ListPage {
            count: matching.len() as u64,
            data: matching
                .into_iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
        }
    }

    pub fn suggestions(&self, kind: FacetKind) -> Vec<FacetSuggestion> {
        match kind {
            FacetKind::Tags => self.tags.clone(),
            FacetKind::Labels => self.labels.clone(),
            FacetKind::Features => self.features.clone(),
        }
    }

    pub fn task_run(&self, task_id: &str, run_id: &str) -> Option<&TaskRunDetail> {
        self.task_runs
            .iter()
            .find(|run| run.task_id == task_id && run.run_id == run_id)
    }
}

fn matches_filters(row: &Row, filters: &FilterCriteria) -> bool {
    let search = filters.search_text().trim().to_lowercase();
    if !search.is_empty() && !row.name.to_lowercase().contains(&search) {
        return false;
    }

    Facet::ALL.iter().all(|facet| {
        let selected = filters.facet(*facet);
        if selected.is_empty() {
            return true;
        }
        match facet {
            Facet::Statuses => selected.contains(&row.status),
            Facet::Tags => row.tags.iter().any(|v| selected.contains(v)),
            Facet::Labels => row.labels.iter().any(|v| selected.contains(v)),
            Facet::Features => row.features.iter().any(|v| selected.contains(v)),
        }
    })
}

pub struct FixtureBackend {
    data: FixtureData,
    source: Option<PathBuf>,
    latency: Duration,
}

impl FixtureBackend {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            source: None,
            latency: Duration::ZERO,
        }
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path_str.clone(),
            source,
        })?;
        let data = FixtureData::parse(&path_str, &content)?;

        info!(
            event = "core.fixture.load_completed",
            path = %path_str,
            entities = data.entities.len(),
            task_runs = data.task_runs.len()
        );

        Ok(Self {
            data,
            source: Some(path.to_path_buf()),
            latency: Duration::ZERO,
        })
    }

    /// Delay every call by `latency` to mimic a remote platform.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn reload(&self, path: &Path) -> Result<FixtureData, FixtureError> {
        let path_str = path.display().to_string();
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| FixtureError::Read {
                    path: path_str.clone(),
                    source,
                })?;
        FixtureData::parse(&path_str, &content)
    }
}

impl DashboardApi for FixtureBackend {
    async fn get_entities(&self, filters: &FilterCriteria) -> Result<ListPage, BackendError> {
        self.simulate_latency().await;
        let page = self.data.query(filters);
        debug!(
            event = "core.fixture.entities_served",
            rows = page.data.len(),
            count = page.count
        );
        Ok(page)
    }

    async fn get_facet_suggestions(
        &self,
        kind: FacetKind,
    ) -> Result<Vec<FacetSuggestion>, BackendError> {
        self.simulate_latency().await;
        Ok(self.data.suggestions(kind))
    }

    async fn get_task_run_details(
        &self,
        task_id: &str,
        run_id: &str,
    ) -> Result<TaskRunDetail, BackendError> {
        self.simulate_latency().await;

        let reloaded = match &self.source {
            Some(path) => Some(self.reload(path).await?),
            None => None,
        };
        let data = reloaded.as_ref().unwrap_or(&self.data);

        data.task_run(task_id, run_id)
            .cloned()
            .ok_or_else(|| BackendError::TaskRunNotFound {
                task_id: task_id.to_string(),
                run_id: run_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::RunStatus;
    use std::num::NonZeroU32;

    fn row(name: &str, status: &str, tags: &[&str]) -> Row {
        Row {
            id: 0,
            name: name.to_string(),
            resource_type: "Entity".to_string(),
            description: String::new(),
            status: status.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            labels: Vec::new(),
            features: Vec::new(),
            properties: Default::default(),
        }
    }

    fn sample() -> FixtureData {
        FixtureData {
            entities: vec![
                row("user", "READY", &["prod"]),
                row("transaction", "READY", &["prod", "finance"]),
                row("user_device", "FAILED", &[]),
                row("merchant", "CREATED", &["finance"]),
            ],
            tags: vec![FacetSuggestion::new("prod"), FacetSuggestion::new("finance")],
            labels: vec![FacetSuggestion::new("is_fraud")],
            features: Vec::new(),
            task_runs: vec![TaskRunDetail {
                task_id: "1".to_string(),
                run_id: "2".to_string(),
                name: "user".to_string(),
                status: RunStatus::Running,
                start_time: None,
                end_time: None,
                logs: Vec::new(),
                error: None,
            }],
        }
    }

    fn names(page: &ListPage) -> Vec<&str> {
        page.data.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_query_defaults_returns_everything() {
        let page = sample().query(&FilterCriteria::default());
        assert_eq!(page.count, 4);
        assert_eq!(page.data.len(), 4);
    }

    #[test]
    fn test_query_search_is_case_insensitive_substring() {
        let criteria = FilterCriteria::default().with_search_text("USER");
        let page = sample().query(&criteria);
        assert_eq!(names(&page), vec!["user", "user_device"]);
    }

    #[test]
    fn test_query_status_and_tag_facets_combine() {
        let criteria = FilterCriteria::default()
            .with_toggled(Facet::Statuses, "READY")
            .with_toggled(Facet::Tags, "finance");
        let page = sample().query(&criteria);
        assert_eq!(names(&page), vec!["transaction"]);
    }

    #[test]
    fn test_query_paginates_by_page_index() {
        let criteria = FilterCriteria::with_page_size(NonZeroU32::new(3).unwrap()).with_offset(1);
        let page = sample().query(&criteria);
        assert_eq!(page.count, 4);
        assert_eq!(names(&page), vec!["merchant"]);
    }

    #[test]
    fn test_query_past_last_page_is_empty() {
        let criteria = FilterCriteria::default().with_offset(9);
        let page = sample().query(&criteria);
        assert_eq!(page.count, 4);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_backend_serves_suggestions() {
        let backend = FixtureBackend::new(sample());
        let tags = backend.get_facet_suggestions(FacetKind::Tags).await.unwrap();
        assert_eq!(tags.len(), 2);
        let features = backend
            .get_facet_suggestions(FacetKind::Features)
            .await
            .unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn test_backend_unknown_task_run_is_not_found() {
        let backend = FixtureBackend::new(sample());
        let err = backend.get_task_run_details("1", "99").await.unwrap_err();
        assert!(matches!(err, BackendError::TaskRunNotFound { .. }));

        let detail = backend.get_task_run_details("1", "2").await.unwrap();
        assert_eq!(detail.status, RunStatus::Running);
    }

    #[tokio::test]
    async fn test_loaded_backend_rereads_task_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let mut data = sample();
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        let backend = FixtureBackend::load(&path).unwrap();
        assert_eq!(backend.data().entities.len(), 4);

        data.task_runs[0].status = RunStatus::Success;
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        let detail = backend.get_task_run_details("1", "2").await.unwrap();
        assert_eq!(detail.status, RunStatus::Success);
    }

    #[tokio::test]
    async fn test_loaded_backend_reports_missing_file_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();
        let backend = FixtureBackend::load(&path).unwrap();

        std::fs::remove_file(&path).unwrap();
        let err = backend.get_task_run_details("1", "2").await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }

    #[test]
    fn test_load_reads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();

        let backend = FixtureBackend::load(&path).unwrap();
        assert_eq!(backend.data().entities, sample().entities);
        assert_eq!(backend.data().task_runs.len(), sample().task_runs.len());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FixtureBackend::load(&path).err().unwrap();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }
}
