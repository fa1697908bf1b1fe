// src/schedule/mod.rs

//! Task schedule representation and the scheduler core.
//!
//! - [`definition`] holds validated task definitions and settings.
//! - [`state`] holds per-task run bookkeeping (`ScheduleState`).
//! - [`scheduler`] decides which tasks are due and applies retry policy.
//! - [`dispatch`] defines the values passed between core and engine.

pub mod definition;
pub mod dispatch;
pub mod scheduler;
pub mod state;

pub use definition::{RetryPolicy, Schedule, SchedulerSettings, TaskDefinition};
pub use dispatch::{Completion, Dispatch};
pub use scheduler::Scheduler;
pub use state::{ScheduleState, TaskState};
