// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::handlers::{HandlerOutput, HandlerRegistry, TaskContext};
use crate::schedule::{Completion, Dispatch, Schedule, Scheduler, SchedulerSettings};
use crate::types::RetryMode;

use super::clock::{Clock, SystemClock};
use super::run_log::{RunLog, RunLogEntry};
use super::{DispatchOutcome, RuntimeOptions};

/// Counts for one tick pass (including any retries drained within it).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub dispatched: usize,
    pub succeeded: usize,
    pub retries_scheduled: usize,
    pub exhausted: usize,
}

impl TickSummary {
    fn record(&mut self, completion: &Completion) {
        self.dispatched += 1;
        match completion {
            Completion::Succeeded => self.succeeded += 1,
            Completion::RetryScheduled { .. } => self.retries_scheduled += 1,
            Completion::Exhausted { .. } => self.exhausted += 1,
            Completion::Ignored => {}
        }
    }

    fn merge(&mut self, other: TickSummary) {
        self.dispatched += other.dispatched;
        self.succeeded += other.succeeded;
        self.retries_scheduled += other.retries_scheduled;
        self.exhausted += other.exhausted;
    }
}

/// Drives the [`Scheduler`] against a clock and executes its dispatches.
///
/// This is the IO shell: the scheduler decides what runs and records
/// outcomes; the runtime sleeps, calls handlers on the blocking pool and
/// writes the run log. Dispatches within a tick run one after another, so
/// schedule state is only ever touched from this loop.
pub struct Runtime {
    scheduler: Scheduler,
    registry: Arc<HandlerRegistry>,
    settings: SchedulerSettings,
    options: RuntimeOptions,
    clock: Arc<dyn Clock>,
    run_log: Option<RunLog>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("settings", &self.settings)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Build a runtime on the wall clock, opening the run log configured in
    /// the schedule (if any).
    pub fn new(
        schedule: Schedule,
        registry: Arc<HandlerRegistry>,
        options: RuntimeOptions,
    ) -> Result<Self> {
        Self::with_clock(schedule, registry, options, Arc::new(SystemClock))
    }

    pub fn with_clock(
        schedule: Schedule,
        registry: Arc<HandlerRegistry>,
        options: RuntimeOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let run_log = match &schedule.settings.run_log {
            Some(path) => Some(RunLog::open(path)?),
            None => None,
        };
        Ok(Self {
            scheduler: Scheduler::new(schedule.tasks),
            registry,
            settings: schedule.settings,
            options,
            clock,
            run_log,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Main loop.
    ///
    /// - Evaluates a tick at the current instant.
    /// - Sleeps until the next tick boundary, or earlier if a retry becomes
    ///   ready first.
    /// - Stops on Ctrl-C (checked while sleeping) or after one tick in
    ///   `once` mode.
    pub async fn run(mut self) {
        info!(
            tasks = self.scheduler.tasks().len(),
            tick_interval_secs = self.settings.tick_interval.as_secs(),
            retry_mode = ?self.settings.retry_mode,
            once = self.options.once,
            "scheduler started"
        );

        loop {
            let now = self.clock.now();
            let summary = self.tick(now).await;
            if summary.dispatched > 0 {
                info!(
                    dispatched = summary.dispatched,
                    succeeded = summary.succeeded,
                    retries_scheduled = summary.retries_scheduled,
                    exhausted = summary.exhausted,
                    "tick complete"
                );
            }

            if self.options.once {
                info!("single tick complete; exiting");
                break;
            }

            let delay = self.delay_until_next_wake();
            debug!(delay_ms = delay.as_millis() as u64, "sleeping until next wake");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested; stopping scheduler");
                    break;
                }
            }
        }

        info!("scheduler exiting");
    }

    /// Evaluate one tick at `now` and execute everything it dispatches.
    ///
    /// In `inline` retry mode, or when running `once`, retries created by
    /// this tick are drained before returning.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickSummary {
        let batch = self.scheduler.collect_due(now);
        let mut summary = self.execute_batch(batch).await;

        if self.settings.retry_mode == RetryMode::Inline || self.options.once {
            summary.merge(self.drain_retries().await);
        }
        summary
    }

    /// Run pending retries until none are left, sleeping for each backoff.
    pub async fn drain_retries(&mut self) -> TickSummary {
        let mut summary = TickSummary::default();

        while let Some(ready_at) = self.scheduler.next_retry_at() {
            let now = self.clock.now();
            if let Ok(wait) = (ready_at - now).to_std() {
                if !wait.is_zero() {
                    debug!(wait_ms = wait.as_millis() as u64, "waiting for retry backoff");
                    tokio::time::sleep(wait).await;
                }
            }

            let now = self.clock.now().max(ready_at);
            let batch = self.scheduler.collect_ready_retries(now);
            summary.merge(self.execute_batch(batch).await);
        }

        summary
    }

    /// Execute and complete every dispatch of `batch`, in order.
    async fn execute_batch(&mut self, batch: Vec<Dispatch>) -> TickSummary {
        let mut summary = TickSummary::default();
        for dispatch in batch {
            let (outcome, output) = self.execute(&dispatch).await;
            let finished_at = self.clock.now();
            let completion = self.scheduler.complete(&dispatch, &outcome, finished_at);
            summary.record(&completion);
            self.log_attempt(&dispatch, &outcome, &completion, output, finished_at);
        }
        summary
    }

    async fn execute(&self, dispatch: &Dispatch) -> (DispatchOutcome, Option<HandlerOutput>) {
        let handler = match self.registry.resolve(&dispatch.handler) {
            Ok(h) => h,
            Err(err) => {
                error!(task = %dispatch.task, handler = %dispatch.handler, "handler not registered");
                return (DispatchOutcome::Failed(err.to_string()), None);
            }
        };

        let ctx = TaskContext {
            task_name: dispatch.task.clone(),
            reference_instant: dispatch.due_at,
            parameters: dispatch.params.clone(),
            attempt: dispatch.attempt,
        };

        debug!(
            task = %dispatch.task,
            handler = %dispatch.handler,
            attempt = dispatch.attempt,
            "executing handler"
        );

        match tokio::task::spawn_blocking(move || handler.execute(&ctx)).await {
            Ok(Ok(output)) => {
                info!(
                    task = %dispatch.task,
                    attempt = dispatch.attempt,
                    summary = output.summary.as_deref().unwrap_or(""),
                    "handler succeeded"
                );
                (DispatchOutcome::Success, Some(output))
            }
            Ok(Err(err)) => (DispatchOutcome::Failed(format!("{err:#}")), None),
            Err(join_err) => {
                warn!(task = %dispatch.task, error = %join_err, "handler panicked");
                (
                    DispatchOutcome::Failed(format!("handler panicked: {join_err}")),
                    None,
                )
            }
        }
    }

    /// Append the attempt to the run log. A write failure is logged and
    /// does not affect scheduling.
    fn log_attempt(
        &mut self,
        dispatch: &Dispatch,
        outcome: &DispatchOutcome,
        completion: &Completion,
        output: Option<HandlerOutput>,
        finished_at: DateTime<Utc>,
    ) {
        let Some(log) = self.run_log.as_mut() else {
            return;
        };
        if matches!(completion, Completion::Ignored) {
            return;
        }

        let error = match outcome {
            DispatchOutcome::Success => None,
            DispatchOutcome::Failed(message) => Some(message.clone()),
        };
        let entry = RunLogEntry {
            recorded_at: finished_at,
            task: dispatch.task.clone(),
            handler: dispatch.handler.clone(),
            due_at: dispatch.due_at,
            attempt: dispatch.attempt,
            outcome: completion.label().to_string(),
            error,
            summary: output.and_then(|o| o.summary),
        };
        if let Err(err) = log.append(&entry) {
            error!(
                task = %dispatch.task,
                attempt = dispatch.attempt,
                path = ?log.path(),
                error = %err,
                "failed to write run log entry"
            );
        }
    }

    fn delay_until_next_wake(&self) -> Duration {
        let now = self.clock.now();
        let mut wake = next_tick_boundary(now, self.settings.tick_interval);
        if let Some(retry_at) = self.scheduler.next_retry_at() {
            wake = wake.min(retry_at);
        }
        (wake - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// First instant after `now` that is a whole multiple of `interval` since
/// the Unix epoch.
pub fn next_tick_boundary(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let secs = interval.as_secs().max(1) as i64;
    let next = (now.timestamp().div_euclid(secs) + 1) * secs;
    DateTime::from_timestamp(next, 0).unwrap_or_else(|| now + TimeDelta::seconds(secs))
}
