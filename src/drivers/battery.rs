//! Battery voltage monitor.
//!
//! Reads the battery through a resistor divider on an ADC1 channel.  A
//! failed or implausible conversion surfaces as a [`BatteryError`]; the
//! telemetry relay skips that report.

use crate::drivers::hw_init;
use crate::error::BatteryError;

/// ADC full-scale input at 12 dB attenuation (volts).
const ADC_FULL_SCALE_V: f32 = 3.1;
const ADC_MAX_RAW: f32 = 4095.0;

/// Below this the reading is a disconnected tap, not a battery.
const MIN_PLAUSIBLE_V: f32 = 1.0;
const MAX_PLAUSIBLE_V: f32 = 6.0;

pub struct BatteryMonitor {
    channel: u32,
    divider_ratio: f32,
}

impl BatteryMonitor {
    pub fn new(channel: u32, divider_ratio: f32) -> Self {
        Self {
            channel,
            divider_ratio,
        }
    }

    /// Convert a raw 12-bit reading to battery volts.
    pub fn raw_to_volts(&self, raw: u16) -> f32 {
        f32::from(raw) / ADC_MAX_RAW * ADC_FULL_SCALE_V * self.divider_ratio
    }

    pub fn read_voltage(&mut self) -> Result<f32, BatteryError> {
        let raw = hw_init::adc1_read(self.channel).ok_or(BatteryError::Unavailable)?;
        let volts = self.raw_to_volts(raw);
        if !(MIN_PLAUSIBLE_V..=MAX_PLAUSIBLE_V).contains(&volts) {
            return Err(BatteryError::OutOfRange);
        }
        Ok(volts)
    }
}
