//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO, I2C or radio registers.

use stillpos::app::events::AppEvent;
use stillpos::app::ports::{
    AccelerometerPort, BatteryPort, EventSink, IndicatorPort, LedMode, RadioPort, SampleInterval,
};
use stillpos::error::BatteryError;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    SampleInterval(SampleInterval),
    Led(LedMode),
    Pulse(u32),
    Pairing { name: String, version: String },
    Publish { topic: String, value: f32 },
    Battery(f32),
    RadioPoll,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<PortCall>,
    pub battery: Result<f32, BatteryError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            battery: Ok(3.85),
        }
    }

    /// Every value published under `topic`, oldest first.
    pub fn published(&self, topic: &str) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Publish { topic: t, value } if t == topic => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn pulses(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PortCall::Pulse(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Most recent cadence pushed to the accelerometer.
    pub fn sample_interval(&self) -> Option<SampleInterval> {
        self.calls.iter().rev().find_map(|c| match c {
            PortCall::SampleInterval(i) => Some(*i),
            _ => None,
        })
    }

    /// Most recent steady LED mode.
    pub fn led_mode(&self) -> Option<LedMode> {
        self.calls.iter().rev().find_map(|c| match c {
            PortCall::Led(m) => Some(*m),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelerometerPort for MockHardware {
    fn set_sample_interval(&mut self, interval: SampleInterval) {
        self.calls.push(PortCall::SampleInterval(interval));
    }
}

impl IndicatorPort for MockHardware {
    fn set_mode(&mut self, mode: LedMode) {
        self.calls.push(PortCall::Led(mode));
    }

    fn pulse(&mut self, duration_ms: u32) {
        self.calls.push(PortCall::Pulse(duration_ms));
    }
}

impl RadioPort for MockHardware {
    fn pairing_request(&mut self, name: &str, version: &str) {
        self.calls.push(PortCall::Pairing {
            name: name.to_string(),
            version: version.to_string(),
        });
    }

    fn publish_float(&mut self, topic: &str, value: f32) {
        self.calls.push(PortCall::Publish {
            topic: topic.to_string(),
            value,
        });
    }

    fn publish_battery(&mut self, voltage: f32) {
        self.calls.push(PortCall::Battery(voltage));
    }

    fn poll(&mut self) {
        self.calls.push(PortCall::RadioPoll);
    }
}

impl BatteryPort for MockHardware {
    fn voltage(&mut self) -> Result<f32, BatteryError> {
        self.battery
    }
}

// ── LogSink (EventSink that records) ──────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn holds(&self) -> Vec<stillpos::app::events::HoldReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::HoldMeasured(r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
