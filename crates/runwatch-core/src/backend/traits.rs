use std::future::Future;

use super::errors::BackendError;
use super::types::{FacetKind, FacetSuggestion, ListPage, TaskRunDetail};
use crate::filters::FilterCriteria;

/// The platform API consumed by the controllers.
///
/// Implementations must be safe to call concurrently from any number of
/// components; controllers share one instance through an `Arc` and hold no
/// lock while a call is pending.
pub trait DashboardApi: Send + Sync + 'static {
    /// Fetch one page of resources matching `filters`.
    fn get_entities(
        &self,
        filters: &FilterCriteria,
    ) -> impl Future<Output = Result<ListPage, BackendError>> + Send;

    /// Fetch the suggestion list for one filter-panel facet.
    fn get_facet_suggestions(
        &self,
        kind: FacetKind,
    ) -> impl Future<Output = Result<Vec<FacetSuggestion>, BackendError>> + Send;

    /// Fetch the live detail record of one task run.
    fn get_task_run_details(
        &self,
        task_id: &str,
        run_id: &str,
    ) -> impl Future<Output = Result<TaskRunDetail, BackendError>> + Send;
}
