//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the accelerometer, status LED, battery monitor and radio, exposing
//! them through [`AccelerometerPort`], [`IndicatorPort`], [`BatteryPort`]
//! and [`RadioPort`] (together: [`DevicePorts`](crate::app::ports::DevicePorts)).
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::{
    AccelerometerPort, BatteryPort, IndicatorPort, LedMode, RadioPort, SampleInterval,
};
use crate::drivers::accelerometer::Lis2dh12;
use crate::drivers::battery::BatteryMonitor;
use crate::drivers::status_led::StatusLed;
use crate::error::{BatteryError, SensorError};
use crate::motion::Sample;

use super::radio::RadioAdapter;
use super::transport::Transport;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I: I2c, T: Transport> {
    accel: Lis2dh12<I>,
    led: StatusLed,
    battery: BatteryMonitor,
    radio: RadioAdapter<T>,
    sample_interval: SampleInterval,
}

impl<I: I2c, T: Transport> HardwareAdapter<I, T> {
    pub fn new(
        accel: Lis2dh12<I>,
        led: StatusLed,
        battery: BatteryMonitor,
        radio: RadioAdapter<T>,
    ) -> Self {
        Self {
            accel,
            led,
            battery,
            radio,
            sample_interval: SampleInterval::Disabled,
        }
    }

    /// Read one accelerometer sample (called when the sampling timer fires).
    pub fn read_sample(&mut self) -> Result<Sample, SensorError> {
        self.accel.read_g()
    }

    /// Cadence most recently requested by the domain.
    pub fn sample_interval(&self) -> SampleInterval {
        self.sample_interval
    }

    /// Advance the LED pulse by the time since the last loop pass.
    pub fn tick_led(&mut self, delta_ms: u32) {
        self.led.tick(delta_ms);
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }

    pub fn radio(&self) -> &RadioAdapter<T> {
        &self.radio
    }
}

// ── AccelerometerPort implementation ──────────────────────────

impl<I: I2c, T: Transport> AccelerometerPort for HardwareAdapter<I, T> {
    fn set_sample_interval(&mut self, interval: SampleInterval) {
        self.sample_interval = interval;
        let running = matches!(interval, SampleInterval::Every(_));
        if let Err(e) = self.accel.set_running(running) {
            warn!("HW: accelerometer {} failed: {}", if running { "start" } else { "stop" }, e);
        }
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<I: I2c, T: Transport> IndicatorPort for HardwareAdapter<I, T> {
    fn set_mode(&mut self, mode: LedMode) {
        self.led.set_mode(mode);
    }

    fn pulse(&mut self, duration_ms: u32) {
        self.led.pulse(duration_ms);
    }
}

// ── RadioPort implementation ──────────────────────────────────

impl<I: I2c, T: Transport> RadioPort for HardwareAdapter<I, T> {
    fn pairing_request(&mut self, name: &str, version: &str) {
        self.radio.pairing_request(name, version);
    }

    fn publish_float(&mut self, topic: &str, value: f32) {
        self.radio.publish_float(topic, value);
    }

    fn publish_battery(&mut self, voltage: f32) {
        self.radio.publish_battery(voltage);
    }

    fn poll(&mut self) {
        self.radio.poll();
    }
}

// ── BatteryPort implementation ────────────────────────────────

impl<I: I2c, T: Transport> BatteryPort for HardwareAdapter<I, T> {
    fn voltage(&mut self) -> Result<f32, BatteryError> {
        self.battery.read_voltage()
    }
}
