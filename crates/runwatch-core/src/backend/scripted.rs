//! Test double whose calls stay pending until the test resolves them.
//!
//! Every call is recorded with its request and a responder. Tests wait for
//! a call count, then resolve calls by index in whatever order they need.

use std::sync::Mutex;

use tokio::sync::{oneshot, watch};

use super::errors::BackendError;
use super::traits::DashboardApi;
use super::types::{FacetKind, FacetSuggestion, ListPage, TaskRunDetail};
use crate::filters::FilterCriteria;
use crate::polling::PollTarget;

type Responder<T> = oneshot::Sender<Result<T, BackendError>>;

pub(crate) struct CallLog<R, T> {
    calls: Mutex<Vec<(R, Option<Responder<T>>)>>,
    count: watch::Sender<usize>,
}

impl<R: Clone, T> CallLog<R, T> {
    fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            calls: Mutex::new(Vec::new()),
            count,
        }
    }

    async fn record(&self, request: R) -> Result<T, BackendError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut calls = self.calls.lock().unwrap();
            calls.push((request, Some(tx)));
            self.count.send_replace(calls.len());
        }
        rx.await.unwrap_or_else(|_| {
            Err(BackendError::Unavailable {
                message: "scripted call dropped".to_string(),
            })
        })
    }

    pub(crate) fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn request(&self, index: usize) -> R {
        self.calls.lock().unwrap()[index].0.clone()
    }

    pub(crate) async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.count.subscribe();
        rx.wait_for(|count| *count >= n).await.unwrap();
    }

    /// Resolve call `index`. Returns false if the caller already went away.
    pub(crate) fn resolve(&self, index: usize, outcome: Result<T, BackendError>) -> bool {
        let responder = self.calls.lock().unwrap()[index]
            .1
            .take()
            .expect("call already resolved");
        responder.send(outcome).is_ok()
    }
}

pub(crate) struct ScriptedBackend {
    pub(crate) entities: CallLog<FilterCriteria, ListPage>,
    pub(crate) facets: CallLog<FacetKind, Vec<FacetSuggestion>>,
    pub(crate) details: CallLog<PollTarget, TaskRunDetail>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self {
            entities: CallLog::new(),
            facets: CallLog::new(),
            details: CallLog::new(),
        }
    }

    /// Index of the first facet call for `kind`.
    pub(crate) fn facet_call(&self, kind: FacetKind) -> usize {
        self.facets
            .calls
            .lock()
            .unwrap()
            .iter()
            .position(|(k, _)| *k == kind)
            .expect("facet kind was never requested")
    }
}

impl DashboardApi for ScriptedBackend {
    async fn get_entities(&self, filters: &FilterCriteria) -> Result<ListPage, BackendError> {
        self.entities.record(filters.clone()).await
    }

    async fn get_facet_suggestions(
        &self,
        kind: FacetKind,
    ) -> Result<Vec<FacetSuggestion>, BackendError> {
        self.facets.record(kind).await
    }

    async fn get_task_run_details(
        &self,
        task_id: &str,
        run_id: &str,
    ) -> Result<TaskRunDetail, BackendError> {
        self.details.record(PollTarget::new(task_id, run_id)).await
    }
}
