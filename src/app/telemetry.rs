//! Battery telemetry relay.
//!
//! Stateless: each battery interval reads the voltage once and forwards
//! it.  A failed read is logged and skipped; the next interval is the
//! retry.

use log::{info, warn};

use super::events::AppEvent;
use super::ports::{BatteryPort, EventSink, RadioPort};

/// Read the battery and publish it.  Returns the voltage that was sent.
pub fn relay_battery(
    hw: &mut (impl BatteryPort + RadioPort),
    sink: &mut impl EventSink,
) -> Option<f32> {
    match hw.voltage() {
        Ok(voltage) => {
            info!("APP: Battery voltage = {:.2}", voltage);
            hw.publish_battery(voltage);
            sink.emit(&AppEvent::BatteryReported { voltage });
            Some(voltage)
        }
        Err(e) => {
            warn!("APP: battery read skipped: {}", e);
            sink.emit(&AppEvent::BatteryUnavailable);
            None
        }
    }
}
