use tokio::sync::watch;
use tracing::debug;

use super::types::{Facet, FilterCriteria};

/// Owns the current [`FilterCriteria`] and publishes every new snapshot.
///
/// Each operation derives a fresh snapshot from the current one, publishes
/// it to subscribers and returns it. Publishing happens even when the new
/// snapshot equals the old one, so re-submitting a search re-queries.
pub struct FilterStateStore {
    defaults: FilterCriteria,
    tx: watch::Sender<FilterCriteria>,
}

impl FilterStateStore {
    pub fn new(defaults: FilterCriteria) -> Self {
        let (tx, _) = watch::channel(defaults.clone());
        Self { defaults, tx }
    }

    pub fn current(&self) -> FilterCriteria {
        self.tx.borrow().clone()
    }

    pub fn defaults(&self) -> &FilterCriteria {
        &self.defaults
    }

    /// Receive every published snapshot. The current value counts as seen.
    pub fn subscribe(&self) -> watch::Receiver<FilterCriteria> {
        self.tx.subscribe()
    }

    pub fn set_search_text(&self, value: impl Into<String>) -> FilterCriteria {
        let next = self.current().with_search_text(value);
        self.publish("set_search_text", next)
    }

    pub fn toggle_facet_value(&self, facet: Facet, value: &str) -> FilterCriteria {
        let next = self.current().with_toggled(facet, value);
        self.publish("toggle_facet_value", next)
    }

    pub fn set_offset(&self, page: i64) -> FilterCriteria {
        let next = self.current().with_offset(page);
        self.publish("set_offset", next)
    }

    pub fn reset(&self) -> FilterCriteria {
        self.publish("reset", self.defaults.clone())
    }

    fn publish(&self, operation: &'static str, next: FilterCriteria) -> FilterCriteria {
        debug!(
            event = "core.filters.snapshot_published",
            operation = operation,
            search_text = next.search_text(),
            offset = next.offset()
        );
        self.tx.send_replace(next.clone());
        next
    }
}

impl Default for FilterStateStore {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}
