use std::process::ExitCode;

use tracing::error;

use runwatch_core::init_logging;

mod app;
mod commands;
mod table;

fn main() -> ExitCode {
    let matches = app::build_cli().get_matches();

    // Logging depends on --quiet, so it starts after argument parsing
    init_logging(matches.get_flag("quiet"));

    match commands::run_command(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // User-facing messages were already printed by the command
            error!(event = "cli.exit_failed", error = %e);
            ExitCode::FAILURE
        }
    }
}
