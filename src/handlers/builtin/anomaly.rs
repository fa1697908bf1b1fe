// src/handlers/builtin/anomaly.rs

use crate::anomaly::scan_events;
use crate::config::load_profiles;
use crate::handlers::context::{HandlerOutput, TaskContext};
use crate::handlers::registry::Handler;
use crate::telemetry::read_event_log;

/// Scans an event log with the rule classifier and logs each anomaly.
///
/// Parameters: `input` (event log), `profiles` (document holding the
/// classifier rules).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyScanHandler;

impl Handler for AnomalyScanHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        let (_, classifier) = load_profiles(ctx.required_path("profiles")?)?;
        let events = read_event_log(ctx.required_path("input")?)?;

        let summary = scan_events(events, &classifier)?;

        Ok(HandlerOutput::with_summary(format!(
            "{} anomalies in {} events",
            summary.anomalies, summary.scanned
        )))
    }
}
