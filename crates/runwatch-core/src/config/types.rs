//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [list]
//! page_size = 25
//!
//! [facets]
//! limit = 8
//!
//! [poll]
//! interval_ms = 1500
//!
//! [backend]
//! fixture_path = "dashboard.json"
//! latency_ms = 200
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.runwatch/config.toml`, then `./.runwatch/config.toml`.
/// Unset keys fall back to the defaults in [`super::defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunwatchConfig {
    #[serde(default)]
    pub list: ListConfig,

    #[serde(default)]
    pub facets: FacetConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

/// Resource list settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListConfig {
    /// Rows per page. Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Filter-panel suggestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FacetConfig {
    /// Maximum suggestions kept per facet. Default: 8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PollConfig {
    /// Milliseconds between timer refreshes of a task run. Default: 1500.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

/// Data source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// JSON document served by the fixture backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<PathBuf>,

    /// Simulated latency added to every backend call. Default: 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}
