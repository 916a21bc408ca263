//! The platform API boundary.
//!
//! Controllers depend only on [`DashboardApi`]; [`FixtureBackend`] answers
//! from a local JSON snapshot for the CLI and integration tests.

pub mod errors;
pub mod fixture;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod scripted;

pub use errors::{BackendError, FixtureError};
pub use fixture::{FixtureBackend, FixtureData};
pub use traits::DashboardApi;
pub use types::{
    FacetKind, FacetSuggestion, ListPage, READY_STATUSES, Row, RunStatus, TaskRunDetail,
};
