//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the FSM and its context (session, debounce gate,
//! transmit gate).  It exposes a hardware-agnostic API: one
//! [`dispatch`](AppService::dispatch) call per event, with all I/O flowing
//! through port traits injected at the call site.
//!
//! ```text
//!   Event ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!             │         AppService          │
//!  DevicePorts│  FSM · gates · telemetry    │
//!        ◀────└────────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::DetectorConfig;
use crate::events::Event;
use crate::fsm::context::{FsmContext, LedMode, Outcome, SampleInterval};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Input, StateId};

use super::events::{AppEvent, HoldReport};
use super::ports::{
    AccelerometerPort, DevicePorts, EventSink, HOLD_TIME_TOPIC, IndicatorPort, RadioPort,
};
use super::telemetry;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    /// Last sampling cadence pushed to the accelerometer port.
    applied_interval: Option<SampleInterval>,
    /// Last LED mode pushed to the indicator port.
    applied_led: Option<LedMode>,
    events_handled: u64,
    holds_published: u32,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch any port; call [`start`](Self::start) next.
    pub fn new(config: DetectorConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            applied_interval: None,
            applied_led: None,
            events_handled: 0,
            holds_published: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: enter Idle (sampling off, LED off), announce the
    /// node to the radio, then flash the boot pulse.
    pub fn start(&mut self, now_ms: u64, hw: &mut impl DevicePorts, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        self.apply_outputs(hw);

        hw.pairing_request(&self.ctx.config.node_name, env!("CARGO_PKG_VERSION"));
        hw.pulse(self.ctx.config.boot_pulse_ms);

        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "AppService started in {:?} as '{}' v{}",
            self.fsm.current_state(),
            self.ctx.config.node_name,
            env!("CARGO_PKG_VERSION")
        );
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Handle one event observed at `now_ms`.  Must be called strictly in
    /// event order from a single context.
    pub fn dispatch(
        &mut self,
        event: Event,
        now_ms: u64,
        hw: &mut impl DevicePorts,
        sink: &mut impl EventSink,
    ) {
        self.events_handled += 1;

        match event {
            Event::ButtonPress => self.handle_input(Input::Press, now_ms, hw, sink),
            Event::SampleReady(sample) => {
                self.handle_input(Input::Sample(sample), now_ms, hw, sink);
            }
            Event::BatteryUpdate => {
                telemetry::relay_battery(hw, sink);
            }
            Event::Housekeeping => {
                debug!("housekeeping at {}ms", now_ms);
                hw.poll();
            }
        }
    }

    /// Run one input through the FSM, push outputs to the ports, and
    /// report what happened.
    fn handle_input(
        &mut self,
        input: Input,
        now_ms: u64,
        hw: &mut (impl AccelerometerPort + IndicatorPort + RadioPort),
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.fsm.current_state();
        self.ctx.now_ms = now_ms;

        let new_state = self.fsm.handle(&input, &mut self.ctx);
        self.apply_outputs(hw);

        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
            if new_state == StateId::Armed {
                sink.emit(&AppEvent::SessionStarted { at_ms: now_ms });
            }
        }

        match self.ctx.outcome.take() {
            Some(Outcome::PressIgnored { next_allowed_ms }) => {
                sink.emit(&AppEvent::PressIgnored {
                    at_ms: now_ms,
                    next_allowed_ms,
                });
            }
            Some(Outcome::Rearmed { start_ms }) => {
                sink.emit(&AppEvent::SessionStarted { at_ms: start_ms });
            }
            Some(Outcome::HoldMeasured {
                hold_time_secs,
                magnitude,
                published,
            }) => {
                if published {
                    self.holds_published = self.holds_published.saturating_add(1);
                }
                sink.emit(&AppEvent::HoldMeasured(HoldReport {
                    hold_time_secs,
                    magnitude,
                    ended_at_ms: now_ms,
                    published,
                }));
            }
            Some(Outcome::StraySample) => {
                sink.emit(&AppEvent::StraySample { at_ms: now_ms });
            }
            Some(Outcome::InvalidSample) => {
                sink.emit(&AppEvent::InvalidSample { at_ms: now_ms });
            }
            None => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Tick at which the running session started, if armed.
    pub fn session_start_ms(&self) -> Option<u64> {
        self.ctx.session.map(|s| s.start_ms)
    }

    /// Earliest tick at which a press will be accepted.
    pub fn debounce_next_allowed_ms(&self) -> u64 {
        self.ctx.debounce.next_allowed_ms()
    }

    /// Earliest tick at which a detection will be published.
    pub fn transmit_next_allowed_ms(&self) -> u64 {
        self.ctx.transmit.next_allowed_ms()
    }

    /// Magnitude of the last evaluated sample (g).
    pub fn last_magnitude(&self) -> f32 {
        self.ctx.last_magnitude
    }

    /// Sampling cadence the accelerometer was last told to use.
    pub fn sample_interval(&self) -> SampleInterval {
        self.ctx.commands.sample_interval
    }

    /// Total events dispatched since startup.
    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Hold times actually sent over the radio since startup.
    pub fn holds_published(&self) -> u32 {
        self.holds_published
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate FSM output commands into port calls.
    ///
    /// Order matters and mirrors the detection sequence: stop sampling,
    /// LED to steady mode, then the transmit pulse and the publish.
    fn apply_outputs(&mut self, hw: &mut (impl AccelerometerPort + IndicatorPort + RadioPort)) {
        let cmds = &mut self.ctx.commands;

        // ── Accelerometer cadence ────────────────────────────
        if self.applied_interval != Some(cmds.sample_interval) {
            hw.set_sample_interval(cmds.sample_interval);
            self.applied_interval = Some(cmds.sample_interval);
        }

        // ── LED steady mode ──────────────────────────────────
        if self.applied_led != Some(cmds.led_mode) {
            hw.set_mode(cmds.led_mode);
            self.applied_led = Some(cmds.led_mode);
        }

        // ── One-shots ────────────────────────────────────────
        if let Some(duration_ms) = cmds.pulse_ms.take() {
            hw.pulse(duration_ms);
        }
        if let Some(hold_time_secs) = cmds.publish_hold_time.take() {
            hw.publish_float(HOLD_TIME_TOPIC, hold_time_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatteryError;
    use crate::motion::Sample;
    use crate::app::ports::BatteryPort;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl AccelerometerPort for Recorder {
        fn set_sample_interval(&mut self, interval: SampleInterval) {
            self.calls.push(format!("interval {:?}", interval));
        }
    }
    impl IndicatorPort for Recorder {
        fn set_mode(&mut self, mode: LedMode) {
            self.calls.push(format!("led {:?}", mode));
        }
        fn pulse(&mut self, duration_ms: u32) {
            self.calls.push(format!("pulse {}", duration_ms));
        }
    }
    impl RadioPort for Recorder {
        fn pairing_request(&mut self, name: &str, _version: &str) {
            self.calls.push(format!("pair {}", name));
        }
        fn publish_float(&mut self, topic: &str, value: f32) {
            self.calls.push(format!("pub {} {}", topic, value));
        }
        fn publish_battery(&mut self, voltage: f32) {
            self.calls.push(format!("battery {}", voltage));
        }
    }
    impl BatteryPort for Recorder {
        fn voltage(&mut self) -> Result<f32, BatteryError> {
            Err(BatteryError::Unavailable)
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn start_disables_sampling_then_pairs_then_pulses() {
        let mut app = AppService::new(DetectorConfig::default());
        let mut hw = Recorder::default();
        app.start(0, &mut hw, &mut NullSink);
        assert_eq!(
            hw.calls,
            vec![
                "interval Disabled",
                "led Off",
                "pair still-position-detector",
                "pulse 2000",
            ]
        );
    }

    #[test]
    fn detection_applies_outputs_in_order() {
        let mut app = AppService::new(DetectorConfig::default());
        let mut hw = Recorder::default();
        app.start(0, &mut hw, &mut NullSink);
        hw.calls.clear();

        app.dispatch(Event::ButtonPress, 0, &mut hw, &mut NullSink);
        app.dispatch(
            Event::SampleReady(Sample::new(0.0, 0.0, 1.5)),
            2000,
            &mut hw,
            &mut NullSink,
        );
        assert_eq!(
            hw.calls,
            vec![
                "interval Every(40)",
                "led On",
                "interval Disabled",
                "led Off",
                "pulse 100",
                "pub hold-time 2",
            ]
        );
        assert_eq!(app.holds_published(), 1);
    }

    #[test]
    fn housekeeping_leaves_state_alone() {
        let mut app = AppService::new(DetectorConfig::default());
        let mut hw = Recorder::default();
        app.start(0, &mut hw, &mut NullSink);
        app.dispatch(Event::Housekeeping, 10, &mut hw, &mut NullSink);
        assert_eq!(app.state(), StateId::Idle);
        assert_eq!(app.debounce_next_allowed_ms(), 0);
        assert_eq!(app.events_handled(), 1);
    }
}
