//! Fuzz target: `AppService::dispatch`
//!
//! Decodes arbitrary bytes into a timed event sequence and drives it
//! through the service, asserting that the session exists exactly while
//! armed, that both gates only move forward, and that every published
//! hold time is non-negative and finite.
//!
//! cargo fuzz run fuzz_event_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use stillpos::app::events::AppEvent;
use stillpos::app::ports::{
    AccelerometerPort, BatteryPort, EventSink, IndicatorPort, LedMode, RadioPort, SampleInterval,
};
use stillpos::app::service::AppService;
use stillpos::config::DetectorConfig;
use stillpos::error::BatteryError;
use stillpos::events::Event;
use stillpos::fsm::StateId;
use stillpos::motion::Sample;

struct Ports {
    battery_ok: bool,
}

impl AccelerometerPort for Ports {
    fn set_sample_interval(&mut self, _interval: SampleInterval) {}
}
impl IndicatorPort for Ports {
    fn set_mode(&mut self, _mode: LedMode) {}
    fn pulse(&mut self, _duration_ms: u32) {}
}
impl RadioPort for Ports {
    fn pairing_request(&mut self, _name: &str, _version: &str) {}
    fn publish_float(&mut self, _topic: &str, value: f32) {
        assert!(value.is_finite() && value >= 0.0, "bad hold time {value}");
    }
    fn publish_battery(&mut self, _voltage: f32) {}
}
impl BatteryPort for Ports {
    fn voltage(&mut self) -> Result<f32, BatteryError> {
        self.battery_ok = !self.battery_ok;
        if self.battery_ok { Ok(3.7) } else { Err(BatteryError::Unavailable) }
    }
}

struct Quiet;
impl EventSink for Quiet {
    fn emit(&mut self, _event: &AppEvent) {}
}

fn axis(b: u8) -> f32 {
    (f32::from(b) - 128.0) / 64.0
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(DetectorConfig::default());
    let mut ports = Ports { battery_ok: false };
    app.start(0, &mut ports, &mut Quiet);

    let mut now = 0u64;
    // [gap_hi, gap_lo, kind, x, y, z] per event
    for chunk in data.chunks_exact(6) {
        now += u64::from(u16::from_be_bytes([chunk[0], chunk[1]]));
        let event = match chunk[2] % 4 {
            0 => Event::ButtonPress,
            1 => Event::SampleReady(Sample::new(axis(chunk[3]), axis(chunk[4]), axis(chunk[5]))),
            2 => Event::BatteryUpdate,
            _ => Event::Housekeeping,
        };

        let (d0, t0) = (app.debounce_next_allowed_ms(), app.transmit_next_allowed_ms());
        app.dispatch(event, now, &mut ports, &mut Quiet);

        assert_eq!(app.session_start_ms().is_some(), app.state() == StateId::Armed);
        assert!(app.debounce_next_allowed_ms() >= d0);
        assert!(app.transmit_next_allowed_ms() >= t0);
    }
});
