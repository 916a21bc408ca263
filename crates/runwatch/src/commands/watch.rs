use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info, warn};

use runwatch_core::{
    FixtureBackend, PollState, PollTarget, RefreshScheduler, TaskRunDetail, events,
};

use super::{load_config, open_backend, runtime};

/// Why a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchEnd {
    Terminal,
    RefreshLimit,
    Interrupted,
}

pub(crate) fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let task_id = matches
        .get_one::<String>("task-id")
        .ok_or("Task ID argument is required")?;
    let run_id = matches
        .get_one::<String>("run-id")
        .ok_or("Run ID argument is required")?;
    let refreshes = matches.get_one::<u64>("refreshes").copied();

    let mut config = load_config(matches)?;
    if let Some(interval_ms) = matches.get_one::<u64>("interval-ms") {
        config.poll.interval_ms = Some(*interval_ms);
    }
    let backend = open_backend(&config)?;
    let target = PollTarget::new(task_id.as_str(), run_id.as_str());

    info!(
        event = "cli.watch_started",
        target = %target,
        refreshes = refreshes,
        interval_ms = config.poll.interval_ms
    );

    let interval = config.poll.interval();
    let outcome = runtime()?.block_on(follow(backend, target.clone(), interval, refreshes));

    match outcome {
        Ok(end) => {
            info!(event = "cli.watch_completed", target = %target, end = ?end);
            Ok(())
        }
        Err(message) => {
            eprintln!("Failed to watch task run {}: {}", target, message);
            error!(event = "cli.watch_failed", target = %target, error = %message);
            let err: Box<dyn std::error::Error> = message.into();
            events::log_app_error(err.as_ref());
            Err(err)
        }
    }
}

/// Print every refresh until the run is terminal, the refresh limit is
/// reached or the user interrupts.
async fn follow(
    api: Arc<FixtureBackend>,
    target: PollTarget,
    interval: Duration,
    limit: Option<u64>,
) -> Result<WatchEnd, String> {
    let handle = RefreshScheduler::activate(api, target, interval);
    let mut rx = handle.subscribe();
    let mut seen_fetches = 0;
    let mut successes = 0;
    let mut printed_logs = 0;

    let end = loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break Err("poller stopped unexpectedly".to_string());
                }
                let state = rx.borrow_and_update().clone();
                if state.completed_fetches == seen_fetches {
                    continue;
                }
                seen_fetches = state.completed_fetches;

                if let Some(end) = report(&state, &mut successes, &mut printed_logs, limit) {
                    break end;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Interrupted.");
                break Ok(WatchEnd::Interrupted);
            }
        }
    };

    handle.deactivate();
    end
}

fn report(
    state: &PollState,
    successes: &mut u64,
    printed_logs: &mut usize,
    limit: Option<u64>,
) -> Option<Result<WatchEnd, String>> {
    if let Some(message) = &state.last_error {
        // Without a first good record there is nothing to keep showing
        if state.last_good.is_none() {
            return Some(Err(message.clone()));
        }
        warn!(event = "cli.watch_refresh_failed", error = %message);
        eprintln!("Refresh failed, showing last known state: {}", message);
        return None;
    }

    let detail = state.last_good.as_ref()?;
    *successes += 1;
    print_detail(detail, printed_logs);

    if detail.is_terminal() {
        return Some(Ok(WatchEnd::Terminal));
    }
    if limit.is_some_and(|n| *successes >= n) {
        return Some(Ok(WatchEnd::RefreshLimit));
    }
    None
}

fn print_detail(detail: &TaskRunDetail, printed_logs: &mut usize) {
    let name = if detail.name.is_empty() {
        "task run"
    } else {
        detail.name.as_str()
    };
    println!(
        "{} [{}/{}]: {}",
        name, detail.task_id, detail.run_id, detail.status
    );
    if let Some(start) = detail.start_time {
        println!("  started:  {}", start.to_rfc3339());
    }
    if let Some(end) = detail.end_time {
        println!("  finished: {}", end.to_rfc3339());
    }

    // A re-read record may carry fewer lines than before
    let start = (*printed_logs).min(detail.logs.len());
    for line in &detail.logs[start..] {
        println!("  | {}", line);
    }
    *printed_logs = detail.logs.len();

    if let Some(error) = &detail.error {
        println!("  error: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runwatch_core::{PollPhase, RunStatus};

    fn state(status: Option<RunStatus>, error: Option<&str>, completed: u64) -> PollState {
        PollState {
            phase: PollPhase::Idle,
            last_good: status.map(|status| TaskRunDetail {
                task_id: "42".to_string(),
                run_id: "7".to_string(),
                name: "avg_transactions".to_string(),
                status,
                start_time: None,
                end_time: None,
                logs: vec!["materializing".to_string()],
                error: None,
            }),
            last_error: error.map(str::to_string),
            completed_fetches: completed,
        }
    }

    #[test]
    fn test_terminal_status_ends_watch() {
        let (mut successes, mut logs) = (0, 0);
        let end = report(&state(Some(RunStatus::Success), None, 1), &mut successes, &mut logs, None);
        assert_eq!(end, Some(Ok(WatchEnd::Terminal)));
        assert_eq!(logs, 1);
    }

    #[test]
    fn test_refresh_limit_ends_watch() {
        let (mut successes, mut logs) = (0, 0);
        let running = state(Some(RunStatus::Running), None, 1);
        assert_eq!(report(&running, &mut successes, &mut logs, Some(2)), None);
        assert_eq!(
            report(&running, &mut successes, &mut logs, Some(2)),
            Some(Ok(WatchEnd::RefreshLimit))
        );
    }

    #[test]
    fn test_failure_before_first_record_is_fatal() {
        let (mut successes, mut logs) = (0, 0);
        let failed = state(None, Some("Task run '42/7' not found"), 1);
        assert_eq!(
            report(&failed, &mut successes, &mut logs, None),
            Some(Err("Task run '42/7' not found".to_string()))
        );
    }

    #[test]
    fn test_failure_after_record_keeps_watching() {
        let (mut successes, mut logs) = (0, 0);
        let degraded = state(Some(RunStatus::Running), Some("Backend unavailable"), 2);
        assert_eq!(report(&degraded, &mut successes, &mut logs, Some(1)), None);
        assert_eq!(successes, 0);
    }
}
