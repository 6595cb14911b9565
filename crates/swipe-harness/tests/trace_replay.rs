//! Replays the checked-in JSON traces end to end through the harness.

use std::path::{Path, PathBuf};

use swipe_core::{NoopReason, SettleStyle, SwipeConfig, SwipeTarget};
use swipe_harness::error::EXIT_CONFIG;
use swipe_harness::{Cli, HarnessError, Trace, load_config, run_trace};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

#[test]
fn flick_trace_opens_fully() {
    let trace = Trace::load(&fixture("flick_open.json")).expect("fixture should load");
    let report = run_trace(&trace, SwipeConfig::default()).expect("replay");

    assert_eq!(report.front_left, -100);
    assert_eq!(report.rear_left, 200);
    assert_eq!(report.resting, Some(SwipeTarget::Open));
    let last = report.layouts.last().expect("layouts recorded");
    assert_eq!(last.front.x, -100);
    assert_eq!(last.rear.x, 200);
    // Every layout keeps the rear panel flush against the front panel.
    assert!(report.layouts.iter().all(|l| l.front.x + 300 == l.rear.x));
}

#[test]
fn interrupted_settle_ignores_foreign_pointer_and_stale_frame() {
    let trace = Trace::load(&fixture("interrupted_close.json")).expect("fixture should load");
    let report = run_trace(&trace, SwipeConfig::default()).expect("replay");

    let foreign = report
        .steps
        .iter()
        .find(|s| s.kind == "pointer_move" && s.noop.is_some())
        .expect("foreign pointer step");
    assert_eq!(foreign.noop, Some(NoopReason::PointerMismatch));

    let settle = report.steps.last().expect("settle step");
    assert_eq!(settle.kind, "settle");
    assert_eq!(settle.noop, Some(NoopReason::StaleFrame));
    assert_eq!(report.resting, Some(SwipeTarget::Open));
    assert_eq!(report.front_left, -100);
}

#[test]
fn spring_config_fixture_loads_and_replays() {
    let config = load_config(&fixture("spring.json")).expect("config should load");
    assert_eq!(config.settle, SettleStyle::Spring { stiffness: 220.0 });
    let trace = Trace::load(&fixture("flick_open.json")).expect("fixture should load");
    let report = run_trace(&trace, config).expect("replay");
    assert_eq!(report.front_left, -100);
}

#[test]
fn cli_renders_json_report() {
    let cli = Cli {
        trace: fixture("flick_open.json"),
        config: None,
        json: true,
        log_format: swipe_harness::logging::LogFormat::Text,
    };
    let out = swipe_harness::cli::render(&cli).expect("render");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["front_left"], -100);
    assert_eq!(value["resting"], "open");
    assert_eq!(value["final_state"]["state"], "idle");
}

#[test]
fn invalid_config_file_maps_to_config_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "min_fling_velocity": 500.0, "max_fling_velocity": 10.0 }"#)
        .expect("write config");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(err.exit_code(), EXIT_CONFIG);
}

#[test]
fn missing_trace_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = Trace::load(&path).unwrap_err();
    assert!(matches!(err, HarnessError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}
