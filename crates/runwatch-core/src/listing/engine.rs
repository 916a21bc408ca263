use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::machine::{Completion, ListMachine};
use super::types::{ListView, NavigationRequest, RequestToken};
use crate::backend::{BackendError, DashboardApi, ListPage};
use crate::filters::FilterCriteria;

/// Issues one list query per published [`FilterCriteria`] snapshot.
///
/// Queries are never cancelled at the transport level; every response is
/// fed through [`ListMachine`], which drops anything but the latest token.
pub struct ListQueryEngine;

impl ListQueryEngine {
    /// Follow `criteria` and start querying immediately with its current value.
    ///
    /// The initial query is registered before this returns, so the first
    /// published view already reports `loading`. Must run inside a tokio runtime.
    pub fn spawn<A: DashboardApi>(
        api: Arc<A>,
        defaults: FilterCriteria,
        mut criteria: watch::Receiver<FilterCriteria>,
    ) -> ListHandle {
        let mut machine = ListMachine::new(defaults);
        let initial = criteria.borrow_and_update().clone();
        let token = machine.begin(initial.clone());
        log_query_started(token, &initial);

        let (view_tx, view_rx) = watch::channel(machine.view());
        let task = tokio::spawn(run(api, criteria, machine, view_tx, (token, initial)));

        ListHandle { view_rx, task }
    }
}

async fn run<A: DashboardApi>(
    api: Arc<A>,
    mut criteria: watch::Receiver<FilterCriteria>,
    mut machine: ListMachine,
    view_tx: watch::Sender<ListView>,
    (first_token, first_criteria): (RequestToken, FilterCriteria),
) {
    let mut in_flight = FuturesUnordered::new();
    in_flight.push(query(&api, first_token, first_criteria));

    loop {
        tokio::select! {
            changed = criteria.changed() => {
                if changed.is_err() {
                    debug!(event = "core.list.criteria_closed", pending = in_flight.len());
                    break;
                }
                let next = criteria.borrow_and_update().clone();
                let token = machine.begin(next.clone());
                log_query_started(token, &next);
                in_flight.push(query(&api, token, next));
                view_tx.send_replace(machine.view());
            }
            Some((token, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                match machine.complete(token, &outcome) {
                    Completion::Applied => {
                        let view = machine.view();
                        info!(
                            event = "core.list.query_completed",
                            token = token.get(),
                            rows = view.rows.len(),
                            total_count = view.total_count
                        );
                        view_tx.send_replace(view);
                    }
                    Completion::Failed => {
                        if let Err(e) = &outcome {
                            warn!(
                                event = "core.list.query_failed",
                                token = token.get(),
                                error = %e
                            );
                        }
                        view_tx.send_replace(machine.view());
                    }
                    Completion::Stale => {
                        debug!(
                            event = "core.list.response_discarded",
                            token = token.get(),
                            latest = machine.latest().get()
                        );
                    }
                }
            }
        }
    }
}

// Every call site yields the same future type, so FuturesUnordered can hold them all.
fn query<A: DashboardApi>(
    api: &Arc<A>,
    token: RequestToken,
    criteria: FilterCriteria,
) -> impl Future<Output = (RequestToken, Result<ListPage, BackendError>)> + Send + 'static {
    let api = Arc::clone(api);
    async move {
        let outcome = api.get_entities(&criteria).await;
        (token, outcome)
    }
}

fn log_query_started(token: RequestToken, criteria: &FilterCriteria) {
    info!(
        event = "core.list.query_started",
        token = token.get(),
        search_text = criteria.search_text(),
        offset = criteria.offset()
    );
}

/// Handle to a running [`ListQueryEngine`]. Dropping it stops the engine.
pub struct ListHandle {
    view_rx: watch::Receiver<ListView>,
    task: JoinHandle<()>,
}

impl ListHandle {
    pub fn view(&self) -> ListView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView> {
        self.view_rx.clone()
    }

    /// Wait until no query is outstanding for the latest criteria.
    pub async fn settled(&self) -> ListView {
        let mut rx = self.view_rx.clone();
        match rx.wait_for(|view| !view.loading).await {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        }
    }

    /// Wait until the view shows a settled result for exactly `criteria`.
    pub async fn settled_for(&self, criteria: &FilterCriteria) -> ListView {
        let mut rx = self.view_rx.clone();
        match rx
            .wait_for(|view| !view.loading && view.criteria == *criteria)
            .await
        {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        }
    }

    /// Resolve a row click into a navigation request for that row.
    pub fn select_row(&self, row_id: &str) -> Option<NavigationRequest> {
        let view = self.view_rx.borrow();
        let Some(row) = view.row(row_id) else {
            debug!(event = "core.list.row_select_missed", row_id = row_id);
            return None;
        };
        let request = NavigationRequest::for_row(row);
        info!(
            event = "core.list.row_selected",
            row_id = row_id,
            path = %request.path
        );
        Some(request)
    }

    /// Stop following criteria. Responses still in flight are never applied.
    pub fn deactivate(self) {
        drop(self);
    }
}

impl Drop for ListHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(event = "core.list.deactivated");
    }
}
