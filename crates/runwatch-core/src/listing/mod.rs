//! Filtered, paginated resource listing with stale-response protection.

pub mod engine;
pub mod machine;
pub mod types;

pub use engine::{ListHandle, ListQueryEngine};
pub use machine::{Completion, ListMachine};
pub use types::{EmptyState, ListResult, ListView, NavigationRequest, RequestToken};
