//! Integration tests for the AppService → FSM → ports pipeline.
//!
//! These run on the host (x86_64) and verify the full dispatch chain from
//! an incoming event down to the accelerometer, LED and radio calls
//! without any real hardware.

use super::mock_hw::{LogSink, MockHardware, PortCall};

use stillpos::app::events::AppEvent;
use stillpos::app::ports::{HOLD_TIME_TOPIC, LedMode, SampleInterval};
use stillpos::app::service::AppService;
use stillpos::config::DetectorConfig;
use stillpos::error::BatteryError;
use stillpos::events::Event;
use stillpos::fsm::StateId;
use stillpos::motion::Sample;

const STILL: Sample = Sample::new(0.0, 0.0, 1.0);
const JOLT: Sample = Sample::new(0.0, 0.9, 1.2);

fn make_app() -> (AppService, MockHardware, LogSink) {
    let mut app = AppService::new(DetectorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(0, &mut hw, &mut sink);
    hw.calls.clear();
    sink.events.clear();
    (app, hw, sink)
}

// ── Boot sequence ─────────────────────────────────────────────

#[test]
fn boot_pairs_and_pulses_with_sampling_off() {
    let mut app = AppService::new(DetectorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(0, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(hw.sample_interval(), Some(SampleInterval::Disabled));
    assert_eq!(hw.led_mode(), Some(LedMode::Off));
    assert!(hw.calls.contains(&PortCall::Pairing {
        name: "still-position-detector".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }));
    assert_eq!(hw.pulses(), vec![2000]);
    assert_eq!(sink.events, vec![AppEvent::Started(StateId::Idle)]);
}

// ── Arming ────────────────────────────────────────────────────

#[test]
fn press_arms_and_starts_sampling() {
    let (mut app, mut hw, mut sink) = make_app();

    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Armed);
    assert_eq!(app.session_start_ms(), Some(0));
    assert_eq!(app.debounce_next_allowed_ms(), 600);
    assert_eq!(
        hw.calls,
        vec![
            PortCall::SampleInterval(SampleInterval::Every(40)),
            PortCall::Led(LedMode::On),
        ]
    );
    assert!(sink.events.contains(&AppEvent::SessionStarted { at_ms: 0 }));
}

#[test]
fn press_while_armed_restarts_session() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    hw.calls.clear();

    app.dispatch(Event::ButtonPress, 700, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Armed);
    assert_eq!(app.session_start_ms(), Some(700));
    assert_eq!(app.debounce_next_allowed_ms(), 1300);
    assert!(hw.calls.is_empty(), "cadence and LED are already asserted");

    app.dispatch(Event::SampleReady(JOLT), 2700, &mut hw, &mut sink);
    assert_eq!(hw.published(HOLD_TIME_TOPIC), vec![2.0]);
}

#[test]
fn bouncing_press_is_ignored_while_armed() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    app.dispatch(Event::ButtonPress, 30, &mut hw, &mut sink);

    assert_eq!(app.session_start_ms(), Some(0));
    assert!(sink.events.contains(&AppEvent::PressIgnored {
        at_ms: 30,
        next_allowed_ms: 600
    }));
}

// ── Detection ─────────────────────────────────────────────────

#[test]
fn still_samples_keep_session_running() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);

    for t in (40..2000).step_by(40) {
        app.dispatch(Event::SampleReady(STILL), t, &mut hw, &mut sink);
    }

    assert_eq!(app.state(), StateId::Armed);
    assert!(hw.published(HOLD_TIME_TOPIC).is_empty());
    assert!((app.last_magnitude() - 1.0).abs() < 1e-6);
}

#[test]
fn detection_stops_sampling_and_reports_hold() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 500, &mut hw, &mut sink);
    app.dispatch(Event::SampleReady(JOLT), 3750, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.session_start_ms(), None);
    assert_eq!(hw.sample_interval(), Some(SampleInterval::Disabled));
    assert_eq!(hw.led_mode(), Some(LedMode::Off));
    assert_eq!(hw.pulses(), vec![100]);
    assert_eq!(hw.published(HOLD_TIME_TOPIC), vec![3.25]);

    let holds = sink.holds();
    assert_eq!(holds.len(), 1);
    assert_eq!(holds[0].ended_at_ms, 3750);
    assert!(holds[0].published);
    assert!(holds[0].magnitude > 1.19);
}

#[test]
fn low_magnitude_counts_as_crossing() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    app.dispatch(
        Event::SampleReady(Sample::new(0.0, 0.0, 0.2)),
        1000,
        &mut hw,
        &mut sink,
    );
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(hw.published(HOLD_TIME_TOPIC), vec![1.0]);
}

#[test]
fn band_edges_are_still() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    app.dispatch(Event::SampleReady(Sample::new(0.0, 0.0, 0.95)), 40, &mut hw, &mut sink);
    app.dispatch(Event::SampleReady(Sample::new(0.0, 0.0, 1.19)), 80, &mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Armed);
}

#[test]
fn nan_sample_is_ignored() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    app.dispatch(
        Event::SampleReady(Sample::new(f32::NAN, 0.0, 1.0)),
        40,
        &mut hw,
        &mut sink,
    );
    assert_eq!(app.state(), StateId::Armed);
    assert!(sink.events.contains(&AppEvent::InvalidSample { at_ms: 40 }));
}

#[test]
fn infinite_axis_counts_as_crossing() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    app.dispatch(
        Event::SampleReady(Sample::new(f32::INFINITY, 0.0, 0.0)),
        2000,
        &mut hw,
        &mut sink,
    );
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(hw.published(HOLD_TIME_TOPIC), vec![2.0]);
}

#[test]
fn stray_sample_while_idle_touches_nothing() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::SampleReady(JOLT), 100, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Idle);
    assert!(hw.calls.is_empty());
    assert_eq!(app.debounce_next_allowed_ms(), 0);
    assert_eq!(app.transmit_next_allowed_ms(), 0);
    assert_eq!(sink.events, vec![AppEvent::StraySample { at_ms: 100 }]);
}

// ── Housekeeping & telemetry ──────────────────────────────────

#[test]
fn housekeeping_polls_radio() {
    let (mut app, mut hw, mut sink) = make_app();
    app.dispatch(Event::Housekeeping, 1000, &mut hw, &mut sink);
    assert_eq!(hw.calls, vec![PortCall::RadioPoll]);
}

#[test]
fn battery_out_of_range_is_skipped() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.battery = Err(BatteryError::OutOfRange);
    app.dispatch(Event::BatteryUpdate, 3_600_000, &mut hw, &mut sink);
    assert!(hw.calls.is_empty());
    assert_eq!(sink.events, vec![AppEvent::BatteryUnavailable]);
}

#[test]
fn custom_config_changes_cadence_and_band() {
    let config = DetectorConfig::from_json(
        r#"{"sample_interval_ms": 20, "upper_threshold_g": 1.5}"#,
    )
    .unwrap();
    let mut app = AppService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    app.start(0, &mut hw, &mut sink);

    app.dispatch(Event::ButtonPress, 0, &mut hw, &mut sink);
    assert_eq!(hw.sample_interval(), Some(SampleInterval::Every(20)));

    // 1.3 g is inside the widened band.
    app.dispatch(Event::SampleReady(Sample::new(0.0, 0.0, 1.3)), 20, &mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Armed);
}
