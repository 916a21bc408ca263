//! runwatch-core: list-and-refresh controllers for a platform dashboard
//!
//! This library turns filter and pagination intent into backend queries,
//! loads filter-panel suggestions, and keeps task run details fresh. It is
//! used by the `runwatch` CLI.
//!
//! # Main Entry Points
//!
//! - [`controller`] - Resource list screen: filters, list and facets together
//! - [`polling`] - Task run detail poller
//! - [`backend`] - The platform API trait and a fixture-backed implementation
//! - [`config`] - Configuration management

pub mod backend;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod facets;
pub mod filters;
pub mod listing;
pub mod logging;
pub mod polling;

// Re-export commonly used types at crate root for convenience
pub use backend::{
    BackendError, DashboardApi, FacetKind, FacetSuggestion, FixtureBackend, ListPage, Row,
    RunStatus, TaskRunDetail,
};
pub use config::RunwatchConfig;
pub use controller::ListController;
pub use errors::{ConfigError, RunwatchError, RunwatchResult};
pub use facets::{FacetLists, FacetLoader, FacetSnapshot};
pub use filters::{Facet, FilterCriteria, FilterStateStore, is_filtered};
pub use listing::{EmptyState, ListHandle, ListQueryEngine, ListView, NavigationRequest};
pub use polling::{PollHandle, PollPhase, PollState, PollTarget, RefreshScheduler};

// Re-export logging initialization
pub use logging::init_logging;
