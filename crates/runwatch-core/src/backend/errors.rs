use crate::errors::RunwatchError;

/// Failure of a single backend call.
///
/// Every variant is treated as transient by the controllers: it is logged
/// and the affected state keeps its last known value.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Task run '{task_id}/{run_id}' not found")]
    TaskRunNotFound { task_id: String, run_id: String },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },
}

impl RunwatchError for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            BackendError::Unavailable { .. } => "BACKEND_UNAVAILABLE",
            BackendError::TaskRunNotFound { .. } => "TASK_RUN_NOT_FOUND",
            BackendError::InvalidResponse { .. } => "BACKEND_INVALID_RESPONSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, BackendError::TaskRunNotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read fixture '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RunwatchError for FixtureError {
    fn error_code(&self) -> &'static str {
        match self {
            FixtureError::Read { .. } => "FIXTURE_READ_FAILED",
            FixtureError::Parse { .. } => "FIXTURE_PARSE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, FixtureError::Parse { .. })
    }
}

impl From<FixtureError> for BackendError {
    fn from(error: FixtureError) -> Self {
        match error {
            FixtureError::Read { .. } => BackendError::Unavailable {
                message: error.to_string(),
            },
            FixtureError::Parse { .. } => BackendError::InvalidResponse {
                message: error.to_string(),
            },
        }
    }
}
