// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::anomaly::RuleClassifier;
use crate::config::model::{RawProfilesFile, RawScheduleFile, RawTask};
use crate::config::validate::{validate_profiles, validate_schedule, validate_task};
use crate::errors::{FleetError, Result};
use crate::schedule::Schedule;
use crate::sim::ProfileRegistry;

/// Load a schedule document and return the raw `RawScheduleFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawScheduleFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading schedule file at {:?}", path))?;

    toml::from_str(&contents)
        .map_err(|e| FleetError::Config(format!("parsing schedule TOML from {:?}: {}", path, e)))
}

/// Load a schedule document and validate it against the known handler names.
///
/// This is the entry point the scheduler uses at startup: any invalid entry
/// rejects the whole document.
pub fn load_and_validate(path: impl AsRef<Path>, known_handlers: &[&str]) -> Result<Schedule> {
    let raw = load_from_path(&path)?;
    let schedule = validate_schedule(&raw, known_handlers)?;
    info!(
        path = ?path.as_ref(),
        tasks = schedule.tasks.len(),
        "schedule loaded"
    );
    Ok(schedule)
}

/// Load the success profile document (profiles plus classifier rules).
pub fn load_profiles(path: impl AsRef<Path>) -> Result<(ProfileRegistry, RuleClassifier)> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading profile file at {:?}", path))?;

    let raw: RawProfilesFile = toml::from_str(&contents)
        .map_err(|e| FleetError::Config(format!("parsing profile TOML from {:?}: {}", path, e)))?;

    validate_profiles(&raw)
}

/// Append a task to a schedule document, creating the document if needed.
///
/// The new entry is validated on its own and against the existing names
/// before anything is written. The existing document is re-serialized, so
/// comments are not preserved.
pub fn add_task(path: impl AsRef<Path>, task: RawTask, known_handlers: &[&str]) -> Result<()> {
    let path = path.as_ref();

    let mut raw = if path.exists() {
        load_from_path(path)?
    } else {
        RawScheduleFile::default()
    };

    if raw.task.iter().any(|t| t.name == task.name) {
        return Err(FleetError::Config(format!(
            "a task named '{}' already exists in {:?}",
            task.name, path
        )));
    }

    validate_task(&task, known_handlers)?;

    let name = task.name.clone();
    raw.task.push(task);
    // The document as a whole must still be valid after the append.
    validate_schedule(&raw, known_handlers)?;

    let contents = toml::to_string_pretty(&raw)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("writing schedule file {:?}", path))?;

    info!(task = %name, path = ?path, "task added to schedule");
    Ok(())
}
