pub mod loader;
pub mod types;

pub use loader::FacetLoader;
pub use types::{DEFAULT_FACET_LIMIT, FacetLists, FacetSnapshot};
