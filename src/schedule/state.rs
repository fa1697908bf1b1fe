// src/schedule/state.rs

//! Mutable per-task bookkeeping owned by the [`Scheduler`](crate::schedule::Scheduler).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::TaskName;
use crate::types::TaskStatus;

/// State of a single task across dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskState {
    /// Due instant of the last dispatch that finished (successfully or by
    /// exhausting its retries). Only ever moves forward.
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_status: TaskStatus,
    /// Failed attempts since the last success.
    pub consecutive_failures: u32,
}

/// One [`TaskState`] per task definition.
///
/// Only the scheduler holds a mutable reference; everything else sees
/// `&ScheduleState` or a clone.
#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    tasks: HashMap<TaskName, TaskState>,
}

impl ScheduleState {
    pub fn new<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tasks = names
            .into_iter()
            .map(|n| (n.to_string(), TaskState::default()))
            .collect();
        Self { tasks }
    }

    pub fn get(&self, task: &str) -> Option<&TaskState> {
        self.tasks.get(task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn record_success(&mut self, task: &str, due_at: DateTime<Utc>) {
        if let Some(state) = self.tasks.get_mut(task) {
            state.last_status = TaskStatus::Success;
            state.consecutive_failures = 0;
            advance_last_run(state, due_at);
        }
    }

    /// Count a failed attempt. Returns the new consecutive failure count.
    pub(crate) fn record_failed_attempt(&mut self, task: &str) -> u32 {
        match self.tasks.get_mut(task) {
            Some(state) => {
                state.consecutive_failures += 1;
                state.consecutive_failures
            }
            None => 0,
        }
    }

    /// Mark a dispatch as finished after its retries ran out.
    pub(crate) fn record_exhausted(&mut self, task: &str, due_at: DateTime<Utc>) {
        if let Some(state) = self.tasks.get_mut(task) {
            state.last_status = TaskStatus::Failed;
            advance_last_run(state, due_at);
        }
    }
}

fn advance_last_run(state: &mut TaskState, due_at: DateTime<Utc>) {
    state.last_run_at = Some(match state.last_run_at {
        Some(prev) if prev > due_at => prev,
        _ => due_at,
    });
}
