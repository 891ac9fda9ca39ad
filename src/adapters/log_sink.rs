//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  Each event is one
//! `TAG | key=value` line so the console can be grepped by tag.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::SessionStarted { at_ms } => {
                info!("SESSION | start={}ms", at_ms);
            }
            AppEvent::PressIgnored {
                at_ms,
                next_allowed_ms,
            } => {
                debug!("PRESS | ignored at={}ms next_allowed={}ms", at_ms, next_allowed_ms);
            }
            AppEvent::HoldMeasured(r) => {
                info!(
                    "HOLD | time={:.3}s | |a|={:.3}g | end={}ms | {}",
                    r.hold_time_secs,
                    r.magnitude,
                    r.ended_at_ms,
                    if r.published { "published" } else { "suppressed" },
                );
            }
            AppEvent::StraySample { at_ms } => {
                debug!("SAMPLE | stray at={}ms", at_ms);
            }
            AppEvent::InvalidSample { at_ms } => {
                warn!("SAMPLE | NaN axis at={}ms", at_ms);
            }
            AppEvent::BatteryReported { voltage } => {
                info!("BATT | voltage={:.2}V", voltage);
            }
            AppEvent::BatteryUnavailable => {
                warn!("BATT | unavailable");
            }
        }
    }
}
