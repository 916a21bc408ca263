use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info};

use runwatch_core::errors::ConfigError;
use runwatch_core::{FixtureBackend, RunwatchConfig, events};

mod completions;
mod list;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_app_startup(command);

    let result = match matches.subcommand() {
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches),
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command, result.is_ok());
    result
}

/// Load the config hierarchy and apply the global `--data` override.
fn load_config(matches: &ArgMatches) -> Result<RunwatchConfig, Box<dyn std::error::Error>> {
    let loaded = RunwatchConfig::load_hierarchy().and_then(|mut config| {
        if let Some(path) = matches.get_one::<PathBuf>("data") {
            config.backend.fixture_path = Some(path.clone());
        }
        config.validate()?;
        Ok(config)
    });

    loaded.map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        events::log_runwatch_error(&e);
        e.into()
    })
}

fn open_backend(
    config: &RunwatchConfig,
) -> Result<Arc<FixtureBackend>, Box<dyn std::error::Error>> {
    let Some(path) = config.backend.fixture_path.as_deref() else {
        let e = ConfigError::MissingFixture;
        eprintln!("{}", e);
        events::log_runwatch_error(&e);
        return Err(e.into());
    };

    let backend = match FixtureBackend::load(path) {
        Ok(backend) => backend.with_latency(config.backend.latency()),
        Err(e) => {
            eprintln!("Failed to load platform data: {}", e);
            events::log_runwatch_error(&e);
            return Err(e.into());
        }
    };

    info!(
        event = "cli.backend_opened",
        path = %path.display(),
        latency_ms = config.backend.latency().as_millis() as u64
    );
    Ok(Arc::new(backend))
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
