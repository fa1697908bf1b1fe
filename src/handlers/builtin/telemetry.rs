// src/handlers/builtin/telemetry.rs

use crate::handlers::context::{HandlerOutput, TaskContext};
use crate::handlers::registry::Handler;
use crate::telemetry::{parse_stream_file, write_event_log};

/// Normalises a raw telemetry stream into an event log.
///
/// Parameters: `input`, `output` (both required).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseTelemetryHandler;

impl Handler for ParseTelemetryHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        let input = ctx.required_path("input")?;
        let output = ctx.required_path("output")?;

        let events = parse_stream_file(&input)?;
        write_event_log(&output, &events)?;

        Ok(HandlerOutput::with_summary(format!(
            "{} events written to {}",
            events.len(),
            output.display()
        )))
    }
}
