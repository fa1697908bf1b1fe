// src/handlers/builtin/mission.rs

use crate::handlers::context::{HandlerOutput, TaskContext};
use crate::handlers::registry::Handler;
use crate::mission::{generate, load_overrides, load_template, save_mission, MissionOverrides};

/// Compiles a mission from a template.
///
/// Parameters: `template` (required), `output_dir` (default `missions`),
/// `objective`, `zone`, `priority`, `overrides`.
///
/// The output file is stamped with the dispatch's reference instant, so a
/// retry overwrites the file of the failed attempt instead of adding one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateMissionHandler;

impl Handler for GenerateMissionHandler {
    fn execute(&self, ctx: &TaskContext) -> anyhow::Result<HandlerOutput> {
        let template = load_template(ctx.required_path("template")?)?;

        let node_overrides = match ctx.param("overrides") {
            Some(path) => Some(load_overrides(path)?),
            None => None,
        };
        let overrides = MissionOverrides {
            objective: ctx.param("objective").map(str::to_string),
            zone: ctx.param("zone").map(str::to_string),
            priority: ctx.parsed_param("priority")?,
            node_overrides,
        };

        let mission = generate(&template, &overrides)?;
        let output_dir = ctx.param("output_dir").unwrap_or("missions");
        let path = save_mission(output_dir, &mission, ctx.reference_instant)?;

        Ok(HandlerOutput::with_summary(format!(
            "mission written to {}",
            path.display()
        )))
    }
}
