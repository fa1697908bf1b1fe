use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use chrono::{DateTime, Utc};
use fleetsim::handlers::{Handler, HandlerOutput, TaskContext};

/// One observed handler call.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub task: String,
    pub reference_instant: DateTime<Utc>,
    pub attempt: u32,
}

pub type InvocationLog = Arc<Mutex<Vec<Invocation>>>;

fn record(log: &InvocationLog, ctx: &TaskContext) {
    log.lock().unwrap().push(Invocation {
        task: ctx.task_name.clone(),
        reference_instant: ctx.reference_instant,
        attempt: ctx.attempt,
    });
}

/// Fails the first `failures` calls, then succeeds. Records every call.
pub struct FlakyHandler {
    failures: u32,
    calls: AtomicU32,
    log: InvocationLog,
}

impl FlakyHandler {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            log: InvocationLog::default(),
        }
    }

    /// Never succeeds.
    pub fn always_failing() -> Self {
        Self::new(u32::MAX)
    }

    pub fn invocations(&self) -> InvocationLog {
        Arc::clone(&self.log)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Handler for FlakyHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        record(&self.log, ctx);
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            bail!("simulated failure #{}", call + 1);
        }
        Ok(HandlerOutput::with_summary(format!("ok after {} failures", call)))
    }
}

/// Always succeeds and records every call.
#[derive(Default)]
pub struct RecordingHandler {
    log: InvocationLog,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> InvocationLog {
        Arc::clone(&self.log)
    }
}

impl Handler for RecordingHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        record(&self.log, ctx);
        Ok(HandlerOutput::empty())
    }
}

/// Panics on every call.
pub struct PanickingHandler;

impl Handler for PanickingHandler {
    fn execute(&self, _ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        panic!("handler blew up");
    }
}
