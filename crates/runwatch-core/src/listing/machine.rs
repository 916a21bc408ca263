use super::types::{ListResult, ListView, RequestToken};
use crate::backend::{BackendError, ListPage};
use crate::filters::{FilterCriteria, is_filtered};

/// What happened to a completed list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Latest query failed; the previous result stays visible.
    Failed,
    /// A newer query was issued meanwhile; nothing changed.
    Stale,
}

/// Token-sequenced list state.
///
/// Only the completion of the most recently issued token may touch the
/// result or the loading flag, so responses arriving out of issue order can
/// never overwrite fresher state.
#[derive(Debug, Clone)]
pub struct ListMachine {
    defaults: FilterCriteria,
    criteria: FilterCriteria,
    latest: RequestToken,
    loading: bool,
    result: ListResult,
    last_error: Option<String>,
}

impl ListMachine {
    pub fn new(defaults: FilterCriteria) -> Self {
        Self {
            criteria: defaults.clone(),
            defaults,
            latest: RequestToken::default(),
            loading: false,
            result: ListResult::default(),
            last_error: None,
        }
    }

    /// Record a new query for `criteria` and return its token.
    pub fn begin(&mut self, criteria: FilterCriteria) -> RequestToken {
        self.latest = self.latest.next();
        self.criteria = criteria;
        self.loading = true;
        self.latest
    }

    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: &Result<ListPage, BackendError>,
    ) -> Completion {
        if token != self.latest {
            return Completion::Stale;
        }
        self.loading = false;
        match outcome {
            Ok(page) => {
                self.result = ListResult {
                    rows: page.data.clone(),
                    total_count: page.count,
                };
                self.last_error = None;
                Completion::Applied
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Completion::Failed
            }
        }
    }

    pub fn latest(&self) -> RequestToken {
        self.latest
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> ListView {
        ListView {
            rows: self.result.rows.clone(),
            total_count: self.result.total_count,
            loading: self.loading,
            is_filtered: is_filtered(&self.criteria, &self.defaults),
            criteria: self.criteria.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
