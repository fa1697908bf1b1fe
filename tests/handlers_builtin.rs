// tests/handlers_builtin.rs

use std::path::Path;

use clap::Parser;
use fleetsim::cli::CliArgs;
use fleetsim::engine::read_run_log;
use fleetsim::handlers::builtin::{
    AnomalyScanHandler, GenerateMissionHandler, ParseTelemetryHandler, RunSimulationHandler,
};
use fleetsim::handlers::{Handler, TaskContext};
use fleetsim::mission::load_mission;
use fleetsim::telemetry::read_event_log;
use fleetsim_test_utils::{init_tracing, utc};
use tempfile::tempdir;

const RAW_STREAM: &str = r#"[
  {"timestamp": "2026-03-10T10:00:00Z", "node_id": "w1", "sensor": "thermal", "data": {"temperature_c": 40}},
  {"timestamp": "2026-03-10T10:01:00Z", "node_id": "w1", "sensor": "thermal", "data": {"temperature_c": 99}},
  {"timestamp": "2026-03-10T10:00:30Z", "node_id": "w2", "sensor": "camera", "data": {"resolution": "640x480"}}
]"#;

const PROFILES: &str = r#"
[profiles.default]
max_anomaly_rate = 0.5
min_events = 1
max_duration_seconds = 3600

[profiles.strict]
max_anomaly_rate = 0.0
min_events = 1
max_duration_seconds = 3600

[[classifier.rule]]
event_type = "^thermal$"
key = "temperature_c"
max = 85.0
"#;

const TEMPLATE: &str = r#"
[mission]
objective = "baseline"
target_zone = "GEO-01"
priority_tier = 3
"#;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn cli<const N: usize>(args: [&str; N]) -> CliArgs {
    CliArgs::try_parse_from(args).unwrap()
}

fn ctx(task: &str) -> TaskContext {
    TaskContext::new(task, utc(2026, 3, 10, 12, 0, 0))
}

#[test]
fn test_parse_then_scan_then_simulate() {
    init_tracing();
    let dir = tempdir().unwrap();
    let raw = write(dir.path(), "raw.json", RAW_STREAM);
    let profiles = write(dir.path(), "profiles.toml", PROFILES);
    let template = write(dir.path(), "template.toml", TEMPLATE);
    let events = dir.path().join("events.jsonl").to_string_lossy().into_owned();
    let missions = dir.path().join("missions").to_string_lossy().into_owned();
    let report = dir.path().join("report.json").to_string_lossy().into_owned();

    let out = ParseTelemetryHandler
        .execute(&ctx("parse").with_param("input", &raw).with_param("output", &events))
        .unwrap();
    assert!(out.summary.unwrap().starts_with("3 events"));
    assert_eq!(read_event_log(&events).unwrap().count(), 3);

    let out = AnomalyScanHandler
        .execute(&ctx("scan").with_param("input", &events).with_param("profiles", &profiles))
        .unwrap();
    assert_eq!(out.summary.as_deref(), Some("1 anomalies in 3 events"));

    GenerateMissionHandler
        .execute(
            &ctx("mission")
                .with_param("template", &template)
                .with_param("zone", "GEO-23")
                .with_param("priority", "1")
                .with_param("output_dir", &missions),
        )
        .unwrap();
    let mission_path = Path::new(&missions).join("compiled_mission_20260310T120000Z.toml");
    let mission = load_mission(&mission_path).unwrap();
    assert_eq!(mission.mission.target_zone, "GEO-23");
    assert_eq!(mission.mission.priority_tier, 1);

    let mission_path = mission_path.to_string_lossy().into_owned();
    let out = RunSimulationHandler
        .execute(
            &ctx("simulate")
                .with_param("mission", &mission_path)
                .with_param("telemetry", &events)
                .with_param("profiles", &profiles)
                .with_param("output", &report),
        )
        .unwrap();
    assert_eq!(out.summary.as_deref(), Some("profile 'default' passed=true"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["metrics"]["anomaly_count"], 1);
    assert_eq!(json["metrics"]["duration_seconds"], 60.0);

    // A failing verdict is still a completed attempt.
    let out = RunSimulationHandler
        .execute(
            &ctx("simulate")
                .with_param("mission", &mission_path)
                .with_param("telemetry", &events)
                .with_param("profiles", &profiles)
                .with_param("profile", "strict"),
        )
        .unwrap();
    assert_eq!(out.summary.as_deref(), Some("profile 'strict' passed=false"));
}

#[test]
fn test_missing_or_invalid_parameters_fail_the_attempt() {
    let err = ParseTelemetryHandler.execute(&ctx("parse")).unwrap_err();
    assert!(err.to_string().contains("missing parameter 'input'"));

    let dir = tempdir().unwrap();
    let template = write(dir.path(), "template.toml", TEMPLATE);
    let err = GenerateMissionHandler
        .execute(
            &ctx("mission")
                .with_param("template", &template)
                .with_param("priority", "high"),
        )
        .unwrap_err();
    assert!(format!("{err:#}").contains("parameter 'priority' has invalid value 'high'"));

    let err = RunSimulationHandler
        .execute(
            &ctx("simulate")
                .with_param("profiles", "/definitely/not/here.toml")
                .with_param("mission", "m.toml")
                .with_param("telemetry", "e.jsonl"),
        )
        .unwrap_err();
    assert!(format!("{err:#}").contains("here.toml"));
}

#[tokio::test]
async fn test_cli_schedule_once_runs_builtin_handler() {
    init_tracing();
    let dir = tempdir().unwrap();
    let raw = write(dir.path(), "raw.json", RAW_STREAM);
    let events = dir.path().join("events.jsonl");
    let run_log = dir.path().join("runs.jsonl");
    let schedule = dir.path().join("Schedule.toml");

    let args = cli([
        "fleetsim",
        "schedule",
        "add",
        "--schedule",
        schedule.to_str().unwrap(),
        "--name",
        "parse",
        "--trigger",
        "* * * * *",
        "--handler",
        "parse_telemetry",
        "--param",
        &format!("input={raw}"),
        "--param",
        &format!("output={}", events.display()),
    ]);
    fleetsim::run(args).await.unwrap();

    // Point the run log into the temp dir.
    let mut contents = std::fs::read_to_string(&schedule).unwrap();
    contents = contents.replacen(
        "[scheduler]",
        &format!("[scheduler]\nrun_log = {:?}", run_log.to_string_lossy()),
        1,
    );
    std::fs::write(&schedule, contents).unwrap();

    let args = cli([
        "fleetsim",
        "schedule",
        "run",
        "--once",
        "--schedule",
        schedule.to_str().unwrap(),
    ]);
    let status = fleetsim::run(args).await.unwrap();
    assert_eq!(status, fleetsim::RunStatus::Success);

    assert_eq!(read_event_log(&events).unwrap().count(), 3);
    let entries = read_run_log(&run_log).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, "success");
}

#[tokio::test]
async fn test_cli_simulate_exit_status_reflects_verdict() {
    let dir = tempdir().unwrap();
    let raw = write(dir.path(), "raw.json", RAW_STREAM);
    let profiles = write(dir.path(), "profiles.toml", PROFILES);
    let mission = write(dir.path(), "mission.toml", TEMPLATE);
    let report = dir.path().join("report.json");

    for (profile, expected) in [
        ("default", fleetsim::RunStatus::Success),
        ("strict", fleetsim::RunStatus::SimulationFailed),
    ] {
        let args = cli([
            "fleetsim",
            "simulate",
            "--mission",
            &mission,
            "--telemetry",
            &raw,
            "--raw",
            "--profiles",
            &profiles,
            "--profile",
            profile,
            "--output",
            report.to_str().unwrap(),
        ]);
        let status = fleetsim::run(args).await.unwrap();
        assert_eq!(status, expected);
        assert_eq!(status.exit_code(), if profile == "default" { 0 } else { 2 });
    }

    let args = cli([
        "fleetsim",
        "simulate",
        "--mission",
        &mission,
        "--telemetry",
        &raw,
        "--raw",
        "--profiles",
        &profiles,
        "--profile",
        "missing",
    ]);
    assert!(fleetsim::run(args).await.is_err());
}
