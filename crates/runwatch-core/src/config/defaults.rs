//! Default values and resolved accessors for configuration types.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::config::types::{BackendConfig, FacetConfig, ListConfig, PollConfig, RunwatchConfig};
use crate::facets::DEFAULT_FACET_LIMIT;
use crate::filters::{DEFAULT_PAGE_SIZE, FilterCriteria};
use crate::polling::DEFAULT_POLL_INTERVAL;

impl ListConfig {
    /// Returns the page size, defaulting to 10. A zero value falls back too.
    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
            .and_then(NonZeroU32::new)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

impl FacetConfig {
    /// Returns the suggestion cap, defaulting to 8.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_FACET_LIMIT)
    }
}

impl PollConfig {
    /// Returns the poll interval, defaulting to 1500ms.
    pub fn interval(&self) -> Duration {
        self.interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}

impl BackendConfig {
    /// Returns the simulated latency, defaulting to none.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms.unwrap_or(0))
    }
}

impl RunwatchConfig {
    /// The criteria a list controller starts from and resets to.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::with_page_size(self.list.page_size())
    }
}
