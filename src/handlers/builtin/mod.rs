// src/handlers/builtin/mod.rs

//! Built-in handlers. Each one reads its inputs from the task parameters;
//! a missing or malformed parameter fails the attempt.

use std::sync::Arc;

use crate::handlers::registry::Handler;

pub mod anomaly;
pub mod mission;
pub mod simulation;
pub mod telemetry;

pub use anomaly::AnomalyScanHandler;
pub use mission::GenerateMissionHandler;
pub use simulation::RunSimulationHandler;
pub use telemetry::ParseTelemetryHandler;

pub const GENERATE_MISSION: &str = "generate_mission";
pub const PARSE_TELEMETRY: &str = "parse_telemetry";
pub const ANOMALY_SCAN: &str = "anomaly_scan";
pub const RUN_SIMULATION: &str = "run_simulation";

pub(crate) fn all() -> Vec<(&'static str, Arc<dyn Handler>)> {
    vec![
        (GENERATE_MISSION, Arc::new(GenerateMissionHandler)),
        (PARSE_TELEMETRY, Arc::new(ParseTelemetryHandler)),
        (ANOMALY_SCAN, Arc::new(AnomalyScanHandler)),
        (RUN_SIMULATION, Arc::new(RunSimulationHandler)),
    ]
}
