// src/schedule/scheduler.rs

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::engine::{DispatchOutcome, TaskName};
use crate::schedule::definition::TaskDefinition;
use crate::schedule::dispatch::{Completion, Dispatch};
use crate::schedule::state::{ScheduleState, TaskState};

/// A failed dispatch waiting for its next attempt.
#[derive(Debug, Clone, Copy)]
struct PendingRetry {
    due_at: DateTime<Utc>,
    next_attempt: u32,
    not_before: DateTime<Utc>,
}

/// Scheduler holds the immutable task list plus all mutable schedule state.
///
/// It is responsible for:
/// - deciding which tasks are due at a given reference instant
/// - keeping at most one dispatch per task in flight
/// - recording outcomes and applying each task's retry policy
///
/// It performs no IO and never reads the clock; callers pass instants in.
#[derive(Debug)]
pub struct Scheduler {
    tasks: Vec<TaskDefinition>,
    state: ScheduleState,
    pending: HashMap<TaskName, PendingRetry>,
    in_flight: HashSet<TaskName>,
}

impl Scheduler {
    /// Construct a scheduler from validated definitions (in dispatch order).
    pub fn new(tasks: Vec<TaskDefinition>) -> Self {
        let state = ScheduleState::new(tasks.iter().map(|t| t.name.as_str()));
        Self {
            tasks,
            state,
            pending: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Read-only view of the schedule state.
    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.state.get(task).copied()
    }

    pub fn has_pending_retries(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Earliest instant at which a pending retry becomes ready.
    pub fn next_retry_at(&self) -> Option<DateTime<Utc>> {
        self.pending.values().map(|p| p.not_before).min()
    }

    /// Collect everything that should run at `now`: ready retries and newly
    /// due tasks, in load order. Returned dispatches are marked in flight
    /// until passed back to [`Scheduler::complete`].
    pub fn collect_due(&mut self, now: DateTime<Utc>) -> Vec<Dispatch> {
        self.collect(now, true)
    }

    /// Like [`Scheduler::collect_due`] but only returns ready retries.
    pub fn collect_ready_retries(&mut self, now: DateTime<Utc>) -> Vec<Dispatch> {
        self.collect(now, false)
    }

    fn collect(&mut self, now: DateTime<Utc>, include_new: bool) -> Vec<Dispatch> {
        let mut ready = Vec::new();

        for def in &self.tasks {
            if self.in_flight.contains(&def.name) {
                debug!(task = %def.name, "previous dispatch still in flight; skipping");
                continue;
            }

            if let Some(retry) = self.pending.get(&def.name).copied() {
                if retry.not_before <= now {
                    self.pending.remove(&def.name);
                    info!(
                        task = %def.name,
                        attempt = retry.next_attempt,
                        due_at = %retry.due_at,
                        "retrying task"
                    );
                    ready.push(dispatch_for(def, retry.due_at, retry.next_attempt));
                }
                // A task waiting on a retry is not due-checked again.
                continue;
            }

            if !include_new || !def.enabled {
                continue;
            }

            let last_run = self.state.get(&def.name).and_then(|s| s.last_run_at);
            if def.trigger.is_due(now, last_run) {
                info!(
                    task = %def.name,
                    trigger = %def.trigger,
                    handler = %def.handler,
                    "task due; dispatching"
                );
                ready.push(dispatch_for(def, now, 1));
            }
        }

        for d in &ready {
            self.in_flight.insert(d.task.clone());
        }

        ready
    }

    /// Record the outcome of a dispatch produced by this scheduler.
    ///
    /// `now` is when the attempt finished; it anchors the retry backoff.
    pub fn complete(
        &mut self,
        dispatch: &Dispatch,
        outcome: &DispatchOutcome,
        now: DateTime<Utc>,
    ) -> Completion {
        let Some(def) = self.tasks.iter().find(|t| t.name == dispatch.task) else {
            warn!(task = %dispatch.task, "completion for unknown task; ignoring");
            return Completion::Ignored;
        };
        if !self.in_flight.remove(&dispatch.task) {
            warn!(task = %dispatch.task, "completion for a task that was not in flight; ignoring");
            return Completion::Ignored;
        }

        match outcome {
            DispatchOutcome::Success => {
                self.state.record_success(&def.name, dispatch.due_at);
                debug!(task = %def.name, attempt = dispatch.attempt, "task succeeded");
                Completion::Succeeded
            }
            DispatchOutcome::Failed(message) => {
                let failures = self.state.record_failed_attempt(&def.name);
                let policy = def.retry_policy;

                // A retry instant past the representable range ends the
                // dispatch like an exhausted budget.
                let retry_at = if dispatch.attempt < policy.max_attempts {
                    now.checked_add_signed(policy.backoff)
                } else {
                    None
                };

                if let Some(not_before) = retry_at {
                    let next_attempt = dispatch.attempt + 1;
                    warn!(
                        task = %def.name,
                        attempt = dispatch.attempt,
                        max_attempts = policy.max_attempts,
                        consecutive_failures = failures,
                        %not_before,
                        error = %message,
                        "task attempt failed; retry scheduled"
                    );
                    self.pending.insert(
                        def.name.clone(),
                        PendingRetry {
                            due_at: dispatch.due_at,
                            next_attempt,
                            not_before,
                        },
                    );
                    Completion::RetryScheduled {
                        next_attempt,
                        not_before,
                    }
                } else {
                    self.state.record_exhausted(&def.name, dispatch.due_at);
                    error!(
                        task = %def.name,
                        attempts = dispatch.attempt,
                        consecutive_failures = failures,
                        due_at = %dispatch.due_at,
                        error = %message,
                        "task failed; retries exhausted"
                    );
                    Completion::Exhausted {
                        attempts: dispatch.attempt,
                    }
                }
            }
        }
    }
}

fn dispatch_for(def: &TaskDefinition, due_at: DateTime<Utc>, attempt: u32) -> Dispatch {
    Dispatch {
        task: def.name.clone(),
        handler: def.handler.clone(),
        due_at,
        attempt,
        params: def.params.clone(),
    }
}
