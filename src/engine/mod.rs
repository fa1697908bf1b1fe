// src/engine/mod.rs

//! Scheduling engine for fleetsim.
//!
//! The pure scheduling state machine lives in [`crate::schedule`]; this
//! module is the async/IO shell around it:
//! - [`runtime`] owns the tick loop, executes handlers on the blocking pool
//!   and feeds outcomes back into the scheduler,
//! - [`run_log`] appends one JSON line per finished attempt,
//! - [`clock`] abstracts "now" so tests can drive time explicitly.

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Result of executing one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    /// The handler returned an error or panicked; carries the message.
    Failed(String),
}

/// Runtime options set from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Evaluate a single tick, drain its retries and exit (`--once`).
    pub once: bool,
}

pub mod clock;
pub mod run_log;
pub mod runtime;

pub use clock::{Clock, SystemClock};
pub use run_log::{read_run_log, RunLog, RunLogEntry};
pub use runtime::{next_tick_boundary, Runtime, TickSummary};
