//! Single-target detail poller with overlap suppression.

pub mod machine;
pub mod scheduler;
pub mod types;

pub use machine::PollMachine;
pub use scheduler::{MIN_POLL_INTERVAL, PollHandle, RefreshScheduler};
pub use types::{DEFAULT_POLL_INTERVAL, PollEvent, PollPhase, PollState, PollTarget, TriggerOutcome};
