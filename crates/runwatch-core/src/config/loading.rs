//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.runwatch/config.toml`
//! 3. **Project config** - `./.runwatch/config.toml`
//! 4. **CLI arguments** - applied by the caller on the returned value

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{BackendConfig, FacetConfig, ListConfig, PollConfig, RunwatchConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

const CONFIG_DIR: &str = ".runwatch";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the user and project config files.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read or parsed, or if
/// the merged result fails validation. Missing files are not errors.
pub fn load_hierarchy() -> Result<RunwatchConfig, ConfigError> {
    let project_root = std::env::current_dir()?;
    load_hierarchy_from(dirs::home_dir().as_deref(), &project_root)
}

/// Same as [`load_hierarchy`] with explicit home and project directories.
pub fn load_hierarchy_from(
    home_dir: Option<&Path>,
    project_root: &Path,
) -> Result<RunwatchConfig, ConfigError> {
    let mut config = RunwatchConfig::default();

    let mut sources = Vec::new();
    if let Some(home) = home_dir {
        sources.push(config_path(home));
    }
    sources.push(config_path(project_root));

    for path in sources {
        if let Some(layer) = load_config_file(&path)? {
            debug!(event = "core.config.layer_loaded", path = %path.display());
            config = merge_configs(config, layer);
        }
    }

    validate_config(&config)?;
    Ok(config)
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load one config file. Returns `Ok(None)` if it does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<RunwatchConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence for
/// every key it sets.
pub fn merge_configs(base: RunwatchConfig, override_config: RunwatchConfig) -> RunwatchConfig {
    RunwatchConfig {
        list: ListConfig {
            page_size: override_config.list.page_size.or(base.list.page_size),
        },
        facets: FacetConfig {
            limit: override_config.facets.limit.or(base.facets.limit),
        },
        poll: PollConfig {
            interval_ms: override_config.poll.interval_ms.or(base.poll.interval_ms),
        },
        backend: BackendConfig {
            fixture_path: override_config
                .backend
                .fixture_path
                .or(base.backend.fixture_path),
            latency_ms: override_config
                .backend
                .latency_ms
                .or(base.backend.latency_ms),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(root: &Path, content: &str) {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        let config = load_hierarchy_from(Some(home.path()), project.path()).unwrap();
        assert_eq!(config, RunwatchConfig::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_config(
            home.path(),
            "[list]\npage_size = 20\n[poll]\ninterval_ms = 3000\n",
        );
        write_config(project.path(), "[list]\npage_size = 5\n");

        let config = load_hierarchy_from(Some(home.path()), project.path()).unwrap();
        assert_eq!(config.list.page_size, Some(5));
        assert_eq!(config.poll.interval_ms, Some(3000));
    }

    #[test]
    fn test_without_home_dir_uses_project_only() {
        let project = TempDir::new().unwrap();
        write_config(project.path(), "[facets]\nlimit = 3\n");

        let config = load_hierarchy_from(None, project.path()).unwrap();
        assert_eq!(config.facets.limit(), 3);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_config(project.path(), "[list\npage_size = ");

        let err = load_hierarchy_from(Some(home.path()), project.path()).unwrap_err();
        match err {
            ConfigError::ConfigParseError { path, .. } => {
                assert!(path.ends_with("config.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merged_config_is_validated() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_config(home.path(), "[poll]\ninterval_ms = 0\n");

        let err = load_hierarchy_from(Some(home.path()), project.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_merge_keeps_base_when_override_unset() {
        let base = RunwatchConfig {
            backend: BackendConfig {
                fixture_path: Some(PathBuf::from("base.json")),
                latency_ms: Some(50),
            },
            ..RunwatchConfig::default()
        };
        let override_config = RunwatchConfig {
            backend: BackendConfig {
                fixture_path: None,
                latency_ms: Some(0),
            },
            ..RunwatchConfig::default()
        };

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.backend.fixture_path, Some(PathBuf::from("base.json")));
        assert_eq!(merged.backend.latency_ms, Some(0));
    }
}
