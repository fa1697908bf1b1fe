// src/schedule/dispatch.rs

//! Values exchanged between the scheduler core and the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::engine::TaskName;

/// A task the scheduler wants executed now.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub task: TaskName,
    pub handler: String,
    /// Reference instant of the tick that found the task due. Retries keep
    /// the original value.
    pub due_at: DateTime<Utc>,
    /// 1-based attempt number for this due instant.
    pub attempt: u32,
    pub params: BTreeMap<String, String>,
}

/// What the scheduler did with a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The attempt succeeded; state recorded.
    Succeeded,
    /// The attempt failed and another one is queued.
    RetryScheduled {
        next_attempt: u32,
        not_before: DateTime<Utc>,
    },
    /// The attempt failed and it was the last one allowed.
    Exhausted { attempts: u32 },
    /// Completion for a task the scheduler is not tracking.
    Ignored,
}

impl Completion {
    /// Short label used in the run log.
    pub fn label(&self) -> &'static str {
        match self {
            Completion::Succeeded => "success",
            Completion::RetryScheduled { .. } => "retry_scheduled",
            Completion::Exhausted { .. } => "failed",
            Completion::Ignored => "ignored",
        }
    }
}
