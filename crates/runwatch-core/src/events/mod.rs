//! Process lifecycle events shared by every CLI command.

use std::error::Error;

use tracing::{error, info, warn};

use crate::errors::RunwatchError;

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown(command: &str, succeeded: bool) {
    info!(
        event = "core.app.shutdown_started",
        command = command,
        succeeded = succeeded
    );
}

/// Log an untyped failure together with its `source` chain.
pub fn log_app_error(error: &dyn Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        cause = %cause_chain(error)
    );
}

/// Log a typed failure. Mistakes the user can fix are warnings.
pub fn log_runwatch_error<E: RunwatchError>(error: &E) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error",
            code = error.error_code(),
            error = %error
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            code = error.error_code(),
            error = %error,
            cause = %cause_chain(error)
        );
    }
}

fn cause_chain(error: &dyn Error) -> String {
    let mut causes = Vec::new();
    let mut next = error.source();
    while let Some(cause) = next {
        causes.push(cause.to_string());
        next = cause.source();
    }
    causes.join(": ")
}
