// src/handlers/mod.rs

//! Handler registry and the built-in handlers.
//!
//! Tasks name their handler symbolically; the name is checked against the
//! registry when the schedule is loaded and resolved again at dispatch time.
//!
//! - [`context`] holds [`TaskContext`] and [`HandlerOutput`].
//! - [`registry`] defines the [`Handler`] trait and [`HandlerRegistry`].
//! - [`builtin`] wraps the mission, telemetry, anomaly and simulation
//!   components as handlers.

pub mod builtin;
pub mod context;
pub mod registry;

pub use context::{HandlerOutput, TaskContext};
pub use registry::{Handler, HandlerRegistry};
