// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `fleetsim`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleetsim",
    version,
    about = "Schedule fleet maintenance tasks and score mission simulations.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLEETSIM_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Log output format. `FLEETSIM_LOG_JSON=1` also selects JSON.
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run or edit the task schedule.
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// Replay telemetry for a mission and score it against a success profile.
    Simulate(SimulateArgs),

    /// Compile missions from templates.
    #[command(subcommand)]
    Mission(MissionCommand),

    /// Normalise raw telemetry streams.
    #[command(subcommand)]
    Telemetry(TelemetryCommand),

    /// Write a checksum report for generated artifacts.
    Audit(AuditArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ScheduleCommand {
    /// Start the scheduler loop.
    Run(ScheduleRunArgs),
    /// Append a task to the schedule document.
    Add(ScheduleAddArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScheduleRunArgs {
    /// Path to the schedule document (TOML).
    #[arg(long, value_name = "PATH", default_value = "Schedule.toml")]
    pub schedule: PathBuf,

    /// Evaluate a single tick (draining its retries) and exit.
    #[arg(long)]
    pub once: bool,

    /// Parse + validate, print tasks and their next due instant, but don't
    /// execute any handlers.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ScheduleAddArgs {
    #[arg(long, value_name = "PATH", default_value = "Schedule.toml")]
    pub schedule: PathBuf,

    /// Unique task name.
    #[arg(long)]
    pub name: String,

    /// Five-field cron expression, e.g. "*/5 * * * *".
    #[arg(long, value_name = "EXPR")]
    pub trigger: String,

    /// Registered handler name.
    #[arg(long)]
    pub handler: String,

    #[arg(long, default_value_t = 1)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = 0.0)]
    pub backoff_seconds: f64,

    /// Add the task disabled.
    #[arg(long)]
    pub disabled: bool,

    /// Handler parameter as `key=value`; repeatable.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Compiled mission document.
    #[arg(long, value_name = "PATH")]
    pub mission: PathBuf,

    /// Telemetry event log (JSON lines), or a raw stream with `--raw`.
    #[arg(long, value_name = "PATH")]
    pub telemetry: PathBuf,

    /// Treat `--telemetry` as a raw node stream and normalise it first.
    #[arg(long)]
    pub raw: bool,

    /// Success profile document (TOML).
    #[arg(long, value_name = "PATH")]
    pub profiles: PathBuf,

    #[arg(long, value_name = "NAME", default_value = "default")]
    pub profile: String,

    /// Where to write the JSON report. Printed to stdout if omitted.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum MissionCommand {
    /// Compile a mission from a template.
    Generate(MissionGenerateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct MissionGenerateArgs {
    #[arg(long, value_name = "PATH")]
    pub template: PathBuf,

    #[arg(long)]
    pub objective: Option<String>,

    /// Target zone identifier.
    #[arg(long)]
    pub zone: Option<String>,

    /// Priority tier (1-5).
    #[arg(long)]
    pub priority: Option<u8>,

    /// TOML or JSON file with node overrides.
    #[arg(long, value_name = "PATH")]
    pub overrides: Option<PathBuf>,

    #[arg(long, value_name = "DIR", default_value = "missions")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TelemetryCommand {
    /// Parse a raw stream into a JSON-lines event log.
    Parse(TelemetryParseArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TelemetryParseArgs {
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    /// Files or directories to hash.
    #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
    pub paths: Vec<PathBuf>,

    /// Glob of paths to skip; repeatable.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Secret key file used to sign the report.
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    #[arg(long, value_name = "PATH", default_value = "audit_report.json")]
    pub output: PathBuf,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
