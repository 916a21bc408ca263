use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::backend::TaskRunDetail;

/// Interval between timer-driven refreshes of a task run.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// The task run a poller refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PollTarget {
    pub task_id: String,
    pub run_id: String,
}

impl PollTarget {
    pub fn new(task_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            run_id: run_id.into(),
        }
    }
}

impl fmt::Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.task_id, self.run_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    #[default]
    Idle,
    Fetching,
}

/// Why a fetch was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    Activated,
    ManualTrigger,
    TimerTick,
}

impl PollEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollEvent::Activated => "activated",
            PollEvent::ManualTrigger => "manual_trigger",
            PollEvent::TimerTick => "timer_tick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    /// A fetch is already in flight; the request is dropped, not queued.
    Suppressed,
}

/// Published state of one poller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollState {
    pub phase: PollPhase,
    /// Latest successfully fetched record; kept across failed fetches.
    pub last_good: Option<TaskRunDetail>,
    /// Error of the latest fetch, cleared by the next success.
    pub last_error: Option<String>,
    /// Fetches finished so far, successful or not.
    pub completed_fetches: u64,
}
