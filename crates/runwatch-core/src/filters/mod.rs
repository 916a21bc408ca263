pub mod diff;
pub mod store;
pub mod types;

pub use diff::is_filtered;
pub use store::FilterStateStore;
pub use types::{DEFAULT_PAGE_SIZE, Facet, FilterCriteria};
