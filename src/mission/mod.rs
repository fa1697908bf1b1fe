// src/mission/mod.rs

//! Mission generation: a TOML template plus operator overrides compiled into
//! a timestamped mission document.

pub mod generate;
pub mod model;

pub use generate::{
    compiled_file_name, generate, load_mission, load_overrides, load_template, save_mission,
    MissionOverrides,
};
pub use model::{Mission, MissionDocument};
