// src/config/mod.rs

//! Configuration documents for fleetsim.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`) for the schedule and the
//!   success profile documents.
//! - Load documents from disk and append tasks (`loader.rs`).
//! - Validate them into domain types, fail-closed (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{add_task, load_and_validate, load_from_path, load_profiles};
pub use model::{
    ClassifierSection, RawClassifierRule, RawProfile, RawProfilesFile, RawScheduleFile, RawTask,
    RetrySection, SchedulerSection,
};
pub use validate::{validate_profiles, validate_schedule, validate_task, MAX_BACKOFF_SECONDS};
