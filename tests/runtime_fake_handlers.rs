// tests/runtime_fake_handlers.rs

use std::sync::Arc;

use fleetsim::engine::{next_tick_boundary, read_run_log, Runtime, RuntimeOptions, TickSummary};
use fleetsim::handlers::HandlerRegistry;
use fleetsim::schedule::Schedule;
use fleetsim::types::TaskStatus;
use fleetsim_test_utils::builders::{ScheduleBuilder, TaskBuilder};
use fleetsim_test_utils::clock::ManualClock;
use fleetsim_test_utils::fake_handlers::{FlakyHandler, PanickingHandler, RecordingHandler};
use fleetsim_test_utils::{init_tracing, utc, with_timeout};
use tempfile::tempdir;

const HANDLERS: &[&str] = &["flaky", "recording", "panicking"];

fn runtime(
    schedule: Schedule,
    registry: HandlerRegistry,
    clock: Arc<ManualClock>,
    once: bool,
) -> Runtime {
    Runtime::with_clock(schedule, Arc::new(registry), RuntimeOptions { once }, clock).unwrap()
}

#[tokio::test]
async fn test_deferred_retries_run_on_following_ticks() {
    init_tracing();
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("runs.jsonl");

    let flaky = Arc::new(FlakyHandler::new(2));
    let mut registry = HandlerRegistry::new();
    registry.register("flaky", flaky.clone()).unwrap();

    let schedule = ScheduleBuilder::new()
        .run_log(&log_path)
        .with_task(TaskBuilder::new("sweep", "*/5 * * * *", "flaky").max_attempts(3))
        .build(HANDLERS);

    let t0 = utc(2026, 3, 10, 10, 5, 0);
    let clock = Arc::new(ManualClock::new(t0));
    let mut rt = runtime(schedule, registry, clock, false);

    let first = rt.tick(t0).await;
    assert_eq!(
        first,
        TickSummary {
            dispatched: 1,
            succeeded: 0,
            retries_scheduled: 1,
            exhausted: 0
        }
    );
    assert!(rt.scheduler().has_pending_retries());

    rt.tick(t0).await;
    let third = rt.tick(t0).await;
    assert_eq!(third.succeeded, 1);

    let state = rt.scheduler().state_of("sweep").unwrap();
    assert_eq!(state.last_status, TaskStatus::Success);
    assert_eq!(state.consecutive_failures, 0);
    assert_eq!(state.last_run_at, Some(t0));

    let calls = flaky.invocations();
    let calls = calls.lock().unwrap();
    let attempts: Vec<_> = calls.iter().map(|c| c.attempt).collect();
    assert_eq!(attempts, vec![1, 2, 3]);
    assert!(calls.iter().all(|c| c.reference_instant == t0));

    let entries = read_run_log(&log_path).unwrap();
    let outcomes: Vec<_> = entries.iter().map(|e| e.outcome.as_str()).collect();
    assert_eq!(outcomes, vec!["retry_scheduled", "retry_scheduled", "success"]);
    assert!(entries[0].error.as_deref().unwrap().contains("simulated failure #1"));
    assert!(entries[2].error.is_none());
    assert!(entries.iter().all(|e| e.task == "sweep" && e.handler == "flaky" && e.due_at == t0));
}

#[tokio::test]
async fn test_inline_mode_drains_retries_within_the_tick() {
    init_tracing();
    let flaky = Arc::new(FlakyHandler::new(2));
    let mut registry = HandlerRegistry::new();
    registry.register("flaky", flaky.clone()).unwrap();

    let schedule = ScheduleBuilder::new()
        .retry_mode("inline")
        .with_task(TaskBuilder::new("sweep", "*/5 * * * *", "flaky").max_attempts(3))
        .build(HANDLERS);

    let t0 = utc(2026, 3, 10, 10, 5, 0);
    let mut rt = runtime(schedule, registry, Arc::new(ManualClock::new(t0)), false);

    let summary = rt.tick(t0).await;
    assert_eq!(summary.dispatched, 3);
    assert_eq!(summary.retries_scheduled, 2);
    assert_eq!(summary.succeeded, 1);
    assert!(!rt.scheduler().has_pending_retries());
    assert_eq!(flaky.calls(), 3);
}

#[tokio::test]
async fn test_exhausted_task_waits_for_next_due_instant() {
    init_tracing();
    let flaky = Arc::new(FlakyHandler::always_failing());
    let mut registry = HandlerRegistry::new();
    registry.register("flaky", flaky.clone()).unwrap();

    let schedule = ScheduleBuilder::new()
        .retry_mode("inline")
        .with_task(TaskBuilder::new("sweep", "*/5 * * * *", "flaky").max_attempts(3))
        .build(HANDLERS);

    let t0 = utc(2026, 3, 10, 10, 5, 0);
    let clock = Arc::new(ManualClock::new(t0));
    let mut rt = runtime(schedule, registry, clock.clone(), false);

    let summary = rt.tick(t0).await;
    assert_eq!(summary.exhausted, 1);

    let state = rt.scheduler().state_of("sweep").unwrap();
    assert_eq!(state.last_status, TaskStatus::Failed);
    assert_eq!(state.consecutive_failures, 3);
    assert_eq!(state.last_run_at, Some(t0));

    let t1 = utc(2026, 3, 10, 10, 6, 0);
    clock.set(t1);
    assert_eq!(rt.tick(t1).await.dispatched, 0);

    let t2 = utc(2026, 3, 10, 10, 10, 0);
    clock.set(t2);
    assert_eq!(rt.tick(t2).await.dispatched, 3);
    assert_eq!(flaky.calls(), 6);
    assert_eq!(rt.scheduler().state_of("sweep").unwrap().consecutive_failures, 6);
}

#[tokio::test]
async fn test_panicking_handler_is_a_failed_attempt_and_others_still_run() {
    init_tracing();
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("runs.jsonl");

    let recording = Arc::new(RecordingHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register("panicking", Arc::new(PanickingHandler)).unwrap();
    registry.register("recording", recording.clone()).unwrap();

    let schedule = ScheduleBuilder::new()
        .run_log(&log_path)
        .with_task(TaskBuilder::new("explodes", "* * * * *", "panicking"))
        .with_task(TaskBuilder::new("steady", "* * * * *", "recording"))
        .build(HANDLERS);

    let t0 = utc(2026, 3, 10, 10, 0, 0);
    let mut rt = runtime(schedule, registry, Arc::new(ManualClock::new(t0)), false);

    let summary = rt.tick(t0).await;
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.exhausted, 1);
    assert_eq!(summary.succeeded, 1);

    assert_eq!(
        rt.scheduler().state_of("explodes").unwrap().last_status,
        TaskStatus::Failed
    );
    assert_eq!(recording.invocations().lock().unwrap().len(), 1);

    let entries = read_run_log(&log_path).unwrap();
    assert_eq!(entries[0].task, "explodes");
    assert_eq!(entries[0].outcome, "failed");
    assert!(entries[0].error.as_deref().unwrap().contains("panicked"));
    assert_eq!(entries[1].outcome, "success");
}

#[tokio::test]
async fn test_run_once_drains_retries_and_exits() {
    init_tracing();
    let flaky = Arc::new(FlakyHandler::new(1));
    let recording = Arc::new(RecordingHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register("flaky", flaky.clone()).unwrap();
    registry.register("recording", recording.clone()).unwrap();

    let schedule = ScheduleBuilder::new()
        .with_task(TaskBuilder::new("sweep", "* * * * *", "flaky").max_attempts(2))
        .with_task(TaskBuilder::new("hourly", "0 * * * *", "recording"))
        .build(HANDLERS);

    let clock = Arc::new(ManualClock::new(utc(2026, 3, 10, 10, 30, 0)));
    let rt = runtime(schedule, registry, clock, true);

    with_timeout(rt.run()).await;

    assert_eq!(flaky.calls(), 2);
    // Not due at 10:30.
    assert!(recording.invocations().lock().unwrap().is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_run_log_write_failure_does_not_strand_the_batch() {
    init_tracing();
    let first = Arc::new(RecordingHandler::new());
    let second = Arc::new(RecordingHandler::new());
    let mut registry = HandlerRegistry::new();
    registry.register("first", first.clone()).unwrap();
    registry.register("second", second.clone()).unwrap();

    // Every write to /dev/full fails with ENOSPC.
    let schedule = ScheduleBuilder::new()
        .run_log("/dev/full")
        .with_task(TaskBuilder::new("first", "* * * * *", "first"))
        .with_task(TaskBuilder::new("second", "* * * * *", "second"))
        .build(&["first", "second"]);

    let t0 = utc(2026, 3, 10, 10, 0, 0);
    let t1 = utc(2026, 3, 10, 10, 1, 0);
    let mut rt = runtime(schedule, registry, Arc::new(ManualClock::new(t0)), false);

    let summary = rt.tick(t0).await;
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(
        rt.scheduler().state_of("second").unwrap().last_status,
        TaskStatus::Success
    );

    assert_eq!(rt.tick(t1).await.succeeded, 2);
    assert_eq!(first.invocations().lock().unwrap().len(), 2);
    assert_eq!(second.invocations().lock().unwrap().len(), 2);
}

#[test]
fn test_registry_rejects_duplicates_and_resolves_by_name() {
    let mut registry = HandlerRegistry::new();
    registry
        .register("recording", Arc::new(RecordingHandler::new()))
        .unwrap();

    let err = registry
        .register("recording", Arc::new(RecordingHandler::new()))
        .unwrap_err();
    assert!(err.is_configuration());

    assert!(registry.resolve("recording").is_ok());
    assert!(matches!(
        registry.resolve("missing"),
        Err(fleetsim::errors::FleetError::UnknownHandler(name)) if name == "missing"
    ));
    assert_eq!(registry.names(), vec!["recording"]);
}

#[test]
fn test_builtin_registry_lists_all_builtins() {
    let registry = HandlerRegistry::with_builtins();
    assert_eq!(
        registry.names(),
        vec!["anomaly_scan", "generate_mission", "parse_telemetry", "run_simulation"]
    );
}

#[test]
fn test_tick_boundaries_align_to_the_interval() {
    use std::time::Duration;

    let minute = Duration::from_secs(60);
    assert_eq!(
        next_tick_boundary(utc(2026, 3, 10, 12, 0, 0), minute),
        utc(2026, 3, 10, 12, 1, 0)
    );
    assert_eq!(
        next_tick_boundary(utc(2026, 3, 10, 12, 0, 59), minute),
        utc(2026, 3, 10, 12, 1, 0)
    );
    assert_eq!(
        next_tick_boundary(utc(2026, 3, 10, 12, 7, 30), Duration::from_secs(300)),
        utc(2026, 3, 10, 12, 10, 0)
    );
}
