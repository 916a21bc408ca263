use crate::config::types::RunwatchConfig;
use crate::errors::ConfigError;

/// Reject explicitly configured values the components cannot run with.
pub fn validate_config(config: &RunwatchConfig) -> Result<(), ConfigError> {
    if config.list.page_size == Some(0) {
        return Err(invalid("list.page_size must be greater than 0"));
    }
    if config.facets.limit == Some(0) {
        return Err(invalid("facets.limit must be greater than 0"));
    }
    if config.poll.interval_ms == Some(0) {
        return Err(invalid("poll.interval_ms must be greater than 0"));
    }
    if let Some(path) = &config.backend.fixture_path
        && path.as_os_str().is_empty()
    {
        return Err(invalid("backend.fixture_path must not be empty"));
    }
    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.to_string(),
    }
}
