//! # Configuration System
//!
//! Hierarchical TOML configuration for runwatch.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.runwatch/config.toml`
//! 3. **Project config** - `./.runwatch/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use runwatch_core::config::RunwatchConfig;
//!
//! fn example() -> Result<(), runwatch_core::errors::ConfigError> {
//!     let config = RunwatchConfig::load_hierarchy()?;
//!     let criteria = config.default_criteria();
//!     assert!(criteria.search_text().is_empty());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{BackendConfig, FacetConfig, ListConfig, PollConfig, RunwatchConfig};
pub use validation::validate_config;

impl RunwatchConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validate_config(self)
    }
}
