// src/mission/generate.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::{FleetError, Result};
use crate::mission::model::{MissionDocument, MAX_PRIORITY_TIER, MIN_PRIORITY_TIER};

/// Values applied on top of a mission template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionOverrides {
    pub objective: Option<String>,
    pub zone: Option<String>,
    pub priority: Option<u8>,
    /// Shallow-merged into `node_config_override`: top-level keys replace
    /// the template's keys wholesale.
    pub node_overrides: Option<toml::Table>,
}

pub fn load_template(path: impl AsRef<Path>) -> Result<MissionDocument> {
    load_document(path.as_ref(), "mission template")
}

pub fn load_mission(path: impl AsRef<Path>) -> Result<MissionDocument> {
    load_document(path.as_ref(), "mission")
}

fn load_document(path: &Path, what: &str) -> Result<MissionDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {:?}", path))?;
    let doc: MissionDocument = toml::from_str(&contents)?;
    Ok(doc)
}

/// Read a node override table. `.json` files are parsed as JSON, anything
/// else as TOML.
pub fn load_overrides(path: impl AsRef<Path>) -> Result<toml::Table> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading node overrides from {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(toml::from_str(&contents)?)
    }
}

/// Apply overrides to a template, producing a new mission document.
pub fn generate(template: &MissionDocument, overrides: &MissionOverrides) -> Result<MissionDocument> {
    let mut mission = template.mission.clone();

    if let Some(objective) = overrides.objective.as_deref().filter(|s| !s.is_empty()) {
        mission.objective = objective.to_string();
    }
    if let Some(zone) = overrides.zone.as_deref().filter(|s| !s.is_empty()) {
        mission.target_zone = zone.to_string();
    }
    if let Some(priority) = overrides.priority {
        mission.priority_tier = priority;
    }
    if let Some(node_overrides) = &overrides.node_overrides {
        for (key, value) in node_overrides {
            mission.node_config_override.insert(key.clone(), value.clone());
        }
    }

    if !(MIN_PRIORITY_TIER..=MAX_PRIORITY_TIER).contains(&mission.priority_tier) {
        return Err(FleetError::Config(format!(
            "priority tier {} outside {MIN_PRIORITY_TIER}..={MAX_PRIORITY_TIER}",
            mission.priority_tier
        )));
    }

    Ok(MissionDocument { mission })
}

/// File name a compiled mission is saved under.
pub fn compiled_file_name(now: DateTime<Utc>) -> String {
    format!("compiled_mission_{}.toml", now.format("%Y%m%dT%H%M%SZ"))
}

/// Write a compiled mission into `dir` and return the file path.
pub fn save_mission(
    dir: impl AsRef<Path>,
    doc: &MissionDocument,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating mission directory {:?}", dir))?;

    let path = dir.join(compiled_file_name(now));
    let contents = toml::to_string_pretty(doc)?;
    fs::write(&path, contents).with_context(|| format!("writing mission to {:?}", path))?;

    info!(
        path = %path.display(),
        objective = %doc.mission.objective,
        zone = %doc.mission.target_zone,
        "mission saved"
    );
    Ok(path)
}
