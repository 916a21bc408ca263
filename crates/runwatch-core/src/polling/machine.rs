use super::types::{PollEvent, PollPhase, PollState, TriggerOutcome};
use crate::backend::{BackendError, TaskRunDetail};

/// Idle/Fetching state machine guarding a single poll target.
///
/// The only transitions are Idle → Fetching (on any trigger) and
/// Fetching → Idle (on completion). Triggers while Fetching are dropped.
#[derive(Debug, Clone, Default)]
pub struct PollMachine {
    state: PollState,
}

impl PollMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&mut self, _event: PollEvent) -> TriggerOutcome {
        match self.state.phase {
            PollPhase::Idle => {
                self.state.phase = PollPhase::Fetching;
                TriggerOutcome::Started
            }
            PollPhase::Fetching => TriggerOutcome::Suppressed,
        }
    }

    /// Record a successful fetch. Returns false if no fetch was in flight.
    pub fn succeed(&mut self, detail: TaskRunDetail) -> bool {
        if !self.finish() {
            return false;
        }
        self.state.last_good = Some(detail);
        self.state.last_error = None;
        true
    }

    /// Record a failed fetch, keeping the last good record.
    pub fn fail(&mut self, error: &BackendError) -> bool {
        if !self.finish() {
            return false;
        }
        self.state.last_error = Some(error.to_string());
        true
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    fn finish(&mut self) -> bool {
        if self.state.phase != PollPhase::Fetching {
            return false;
        }
        self.state.phase = PollPhase::Idle;
        self.state.completed_fetches += 1;
        true
    }
}
