// src/sim/mod.rs

//! Mission simulation harness and success criteria.
//!
//! A run flows one way: telemetry events are classified and folded into a
//! [`MetricsAccumulator`], which is finished into immutable
//! [`MissionRunMetrics`], which [`evaluate`] checks against a
//! [`SuccessProfile`] to build the [`SimulationReport`].

pub mod criteria;
pub mod harness;
pub mod metrics;
pub mod profile;
pub mod report;

pub use criteria::{evaluate, FailureReason};
pub use harness::SimulationHarness;
pub use metrics::{MetricsAccumulator, MissionRunMetrics};
pub use profile::{ProfileRegistry, SuccessProfile};
pub use report::SimulationReport;
