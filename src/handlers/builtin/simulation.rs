// src/handlers/builtin/simulation.rs

use std::sync::Arc;

use tracing::warn;

use crate::config::load_profiles;
use crate::handlers::context::{HandlerOutput, TaskContext};
use crate::handlers::registry::Handler;
use crate::mission::load_mission;
use crate::sim::SimulationHarness;
use crate::telemetry::read_event_log;

/// Runs the simulation harness as a scheduled task.
///
/// Parameters: `mission`, `telemetry` (event log), `profiles` (all
/// required), `profile` (default `default`), `output` (report path).
///
/// A failing verdict is still a successful attempt: rerunning the same
/// inputs cannot change it. Harness errors fail the attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSimulationHandler;

impl Handler for RunSimulationHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        let (profiles, classifier) = load_profiles(ctx.required_path("profiles")?)?;
        let mission = load_mission(ctx.required_path("mission")?)?;
        let telemetry = read_event_log(ctx.required_path("telemetry")?)?;
        let profile = ctx.param("profile").unwrap_or("default");

        let harness = SimulationHarness::new(profiles, Arc::new(classifier));
        let report = harness.run(&mission.mission, telemetry, profile)?;

        if let Some(output) = ctx.param("output") {
            report.write_to(output)?;
        }

        if !report.passed() {
            warn!(
                task = %ctx.task_name,
                profile,
                reasons = ?report.failure_reasons(),
                "simulation did not meet its success profile"
            );
        }

        Ok(HandlerOutput::with_summary(format!(
            "profile '{}' passed={}",
            report.profile_name(),
            report.passed()
        )))
    }
}
