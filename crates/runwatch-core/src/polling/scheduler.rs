use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::OptionFuture;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::machine::PollMachine;
use super::types::{PollEvent, PollState, PollTarget, TriggerOutcome};
use crate::backend::{BackendError, DashboardApi, TaskRunDetail};

/// Keeps one task run's detail record fresh.
///
/// Fetches once on activation, then on every timer tick and manual
/// trigger, with at most one fetch in flight. Each poller is independent;
/// several may watch different targets at once.
pub struct RefreshScheduler;

/// Shortest timer period a poller accepts; shorter intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

impl RefreshScheduler {
    /// Mount a poller for `target`. Must run inside a tokio runtime.
    pub fn activate<A: DashboardApi>(
        api: Arc<A>,
        target: PollTarget,
        interval: Duration,
    ) -> PollHandle {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let mut machine = PollMachine::new();
        machine.trigger(PollEvent::Activated);
        info!(
            event = "core.poll.activated",
            target = %target,
            interval_ms = interval.as_millis() as u64
        );

        let (state_tx, state_rx) = watch::channel(machine.state().clone());
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive(
            api,
            target.clone(),
            interval,
            machine,
            state_tx,
            trigger_rx,
        ));

        PollHandle {
            target,
            state_rx,
            trigger_tx,
            task,
        }
    }
}

async fn drive<A: DashboardApi>(
    api: Arc<A>,
    target: PollTarget,
    interval: Duration,
    mut machine: PollMachine,
    state_tx: watch::Sender<PollState>,
    mut triggers: mpsc::UnboundedReceiver<()>,
) {
    let mut ticks = time::interval_at(Instant::now() + interval, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight = Some(Box::pin(fetch(&api, &target)));

    loop {
        // Triggers and ticks that arrived during a fetch are seen before
        // its completion, so they are suppressed rather than re-fired.
        let event = tokio::select! {
            biased;

            trigger = triggers.recv() => match trigger {
                Some(()) => PollEvent::ManualTrigger,
                None => break,
            },
            _ = ticks.tick() => PollEvent::TimerTick,
            Some(outcome) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                in_flight = None;
                let count = machine.state().completed_fetches + 1;
                match outcome {
                    Ok(detail) => {
                        info!(
                            event = "core.poll.fetch_completed",
                            target = %target,
                            status = %detail.status,
                            fetch = count
                        );
                        machine.succeed(detail);
                    }
                    Err(e) => {
                        warn!(
                            event = "core.poll.fetch_failed",
                            target = %target,
                            error = %e,
                            fetch = count
                        );
                        machine.fail(&e);
                    }
                }
                state_tx.send_replace(machine.state().clone());
                continue;
            }
        };

        match machine.trigger(event) {
            TriggerOutcome::Started => {
                debug!(
                    event = "core.poll.fetch_started",
                    target = %target,
                    trigger = event.as_str()
                );
                in_flight = Some(Box::pin(fetch(&api, &target)));
                state_tx.send_replace(machine.state().clone());
            }
            TriggerOutcome::Suppressed => {
                debug!(
                    event = "core.poll.trigger_suppressed",
                    target = %target,
                    trigger = event.as_str()
                );
            }
        }
    }
}

fn fetch<A: DashboardApi>(
    api: &Arc<A>,
    target: &PollTarget,
) -> impl Future<Output = Result<TaskRunDetail, BackendError>> + Send + 'static {
    let api = Arc::clone(api);
    let target = target.clone();
    async move {
        api.get_task_run_details(&target.task_id, &target.run_id)
            .await
    }
}

/// Handle to a mounted poller. Dropping it unmounts the poller.
pub struct PollHandle {
    target: PollTarget,
    state_rx: watch::Receiver<PollState>,
    trigger_tx: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Request an immediate refresh. Ignored while a fetch is in flight.
    pub fn manual_trigger(&self) {
        if self.trigger_tx.send(()).is_err() {
            debug!(event = "core.poll.trigger_after_stop", target = %self.target);
        }
    }

    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    pub fn target(&self) -> &PollTarget {
        &self.target
    }

    /// Cancel the timer. A fetch still in flight will never update state.
    pub fn deactivate(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
        info!(event = "core.poll.deactivated", target = %self.target);
    }
}
