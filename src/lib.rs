// src/lib.rs

pub mod anomaly;
pub mod audit;
pub mod cli;
pub mod config;
pub mod cron;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod mission;
pub mod schedule;
pub mod sim;
pub mod telemetry;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::cli::{
    AuditArgs, CliArgs, Command, MissionCommand, MissionGenerateArgs, ScheduleAddArgs,
    ScheduleCommand, ScheduleRunArgs, SimulateArgs, TelemetryCommand, TelemetryParseArgs,
};
use crate::config::model::{RawTask, RetrySection};
use crate::config::{add_task, load_and_validate, load_profiles};
use crate::engine::{Runtime, RuntimeOptions};
use crate::handlers::HandlerRegistry;
use crate::mission::MissionOverrides;
use crate::schedule::Schedule;
use crate::sim::SimulationHarness;
use crate::telemetry::TelemetryEvent;

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// A simulation ran to completion but missed its success profile.
    SimulationFailed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::SimulationFailed => 2,
        }
    }
}

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    match args.command {
        Command::Schedule(ScheduleCommand::Run(a)) => run_schedule(a).await,
        Command::Schedule(ScheduleCommand::Add(a)) => schedule_add(a),
        Command::Simulate(a) => simulate(a),
        Command::Mission(MissionCommand::Generate(a)) => generate_mission(a),
        Command::Telemetry(TelemetryCommand::Parse(a)) => parse_telemetry(a),
        Command::Audit(a) => run_audit(a),
    }
}

async fn run_schedule(args: ScheduleRunArgs) -> Result<RunStatus> {
    let registry = Arc::new(HandlerRegistry::with_builtins());
    let schedule = load_and_validate(&args.schedule, &registry.names())?;

    if args.dry_run {
        print_dry_run(&schedule);
        return Ok(RunStatus::Success);
    }

    let options = RuntimeOptions { once: args.once };
    let runtime = Runtime::new(schedule, registry, options)?;
    runtime.run().await;
    Ok(RunStatus::Success)
}

fn schedule_add(args: ScheduleAddArgs) -> Result<RunStatus> {
    let registry = HandlerRegistry::with_builtins();
    let task = RawTask {
        name: args.name,
        trigger: args.trigger,
        handler: args.handler,
        enabled: !args.disabled,
        retry: RetrySection {
            max_attempts: args.max_attempts,
            backoff_seconds: args.backoff_seconds,
        },
        params: args.params.into_iter().collect(),
    };
    let name = task.name.clone();
    add_task(&args.schedule, task, &registry.names())?;
    println!("added task '{name}' to {}", args.schedule.display());
    Ok(RunStatus::Success)
}

fn simulate(args: SimulateArgs) -> Result<RunStatus> {
    let (profiles, classifier) = load_profiles(&args.profiles)?;
    let mission = mission::load_mission(&args.mission)?;

    let events: Box<dyn Iterator<Item = errors::Result<TelemetryEvent>>> = if args.raw {
        let parsed = telemetry::parse_stream_file(&args.telemetry)?;
        Box::new(parsed.into_iter().map(Ok))
    } else {
        Box::new(telemetry::read_event_log(&args.telemetry)?)
    };

    let harness = SimulationHarness::new(profiles, Arc::new(classifier));
    let report = harness.run(&mission.mission, events, &args.profile)?;

    match &args.output {
        Some(path) => {
            report.write_to(path)?;
            info!(path = %path.display(), passed = report.passed(), "report written");
        }
        None => println!("{}", report.to_json_pretty()?),
    }

    if report.passed() {
        Ok(RunStatus::Success)
    } else {
        Ok(RunStatus::SimulationFailed)
    }
}

fn generate_mission(args: MissionGenerateArgs) -> Result<RunStatus> {
    let template = mission::load_template(&args.template)?;
    let node_overrides = args
        .overrides
        .as_ref()
        .map(|path| mission::load_overrides(path))
        .transpose()?;

    let overrides = MissionOverrides {
        objective: args.objective,
        zone: args.zone,
        priority: args.priority,
        node_overrides,
    };
    let compiled = mission::generate(&template, &overrides)?;
    let path = mission::save_mission(&args.output_dir, &compiled, Utc::now())?;
    println!("{}", path.display());
    Ok(RunStatus::Success)
}

fn parse_telemetry(args: TelemetryParseArgs) -> Result<RunStatus> {
    let events = telemetry::parse_stream_file(&args.input)?;
    telemetry::write_event_log(&args.output, &events)?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        events = events.len(),
        "telemetry parsed"
    );
    Ok(RunStatus::Success)
}

fn run_audit(args: AuditArgs) -> Result<RunStatus> {
    let excludes = audit::build_excludes(&args.exclude)?;
    let files = audit::digest_paths(&args.paths, &excludes)?;
    let mut report = audit::AuditReport::new(files);

    if let Some(key_path) = &args.key {
        let secret = audit::load_signing_key(key_path)?;
        report.sign(&secret)?;
    }
    report
        .write_to(&args.output)
        .with_context(|| format!("writing audit report {:?}", args.output))?;
    Ok(RunStatus::Success)
}

/// Simple dry-run output: tasks, triggers and their next due instant.
fn print_dry_run(schedule: &Schedule) {
    let now = Utc::now();

    println!("fleetsim dry-run");
    println!(
        "  scheduler.tick_interval_secs = {}",
        schedule.settings.tick_interval.as_secs()
    );
    println!("  scheduler.retry_mode = {:?}", schedule.settings.retry_mode);
    if let Some(ref log) = schedule.settings.run_log {
        println!("  scheduler.run_log = {}", log.display());
    }
    println!();

    println!("tasks ({}):", schedule.tasks.len());
    for task in &schedule.tasks {
        println!("  - {}", task.name);
        println!("      trigger: {}", task.trigger);
        println!("      handler: {}", task.handler);
        if !task.enabled {
            println!("      enabled: false");
        }
        if task.retry_policy.max_attempts > 1 {
            println!(
                "      retry: {} attempts, {}s backoff",
                task.retry_policy.max_attempts,
                task.retry_policy.backoff.num_milliseconds() as f64 / 1000.0
            );
        }
        if !task.params.is_empty() {
            println!("      params: {:?}", task.params);
        }
        match task.trigger.next_due(now) {
            Some(next) => println!("      next due: {next}"),
            None => println!("      next due: never"),
        }
    }

    debug!("dry-run complete (no execution)");
}
