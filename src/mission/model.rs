// src/mission/model.rs

use serde::{Deserialize, Serialize};

pub const MIN_PRIORITY_TIER: u8 = 1;
pub const MAX_PRIORITY_TIER: u8 = 5;

/// Top-level mission document: everything lives under `[mission]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MissionDocument {
    #[serde(default)]
    pub mission: Mission,
}

/// A mission, either a template or a compiled one.
///
/// Keys this crate does not interpret are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default)]
    pub objective: String,

    #[serde(default)]
    pub target_zone: String,

    /// Lower numbers are more urgent.
    #[serde(default = "default_priority_tier")]
    pub priority_tier: u8,

    #[serde(default)]
    pub node_config_override: toml::Table,

    #[serde(flatten)]
    pub extra: toml::Table,
}

fn default_priority_tier() -> u8 {
    3
}

impl Default for Mission {
    fn default() -> Self {
        Self {
            objective: String::new(),
            target_zone: String::new(),
            priority_tier: default_priority_tier(),
            node_config_override: toml::Table::new(),
            extra: toml::Table::new(),
        }
    }
}
