//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A press was accepted and a session began (or restarted).
    SessionStarted { at_ms: u64 },

    /// A press landed inside the debounce window and was dropped.
    PressIgnored { at_ms: u64, next_allowed_ms: u64 },

    /// A session ended on a threshold crossing.
    HoldMeasured(HoldReport),

    /// A sample arrived while idle and was ignored.
    StraySample { at_ms: u64 },

    /// A sample had a NaN axis and was ignored.
    InvalidSample { at_ms: u64 },

    /// Battery voltage read and forwarded to the radio.
    BatteryReported { voltage: f32 },

    /// Battery voltage could not be read; skipped until the next interval.
    BatteryUnavailable,
}

/// Result of one measurement session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldReport {
    pub hold_time_secs: f32,
    pub magnitude: f32,
    pub ended_at_ms: u64,
    /// `false` when the transmit cooldown suppressed the publish.
    pub published: bool,
}
