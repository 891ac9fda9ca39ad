//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` replaces the module-level globals a C firmware would
//! use: the current session, both rate gates, the latest magnitude and
//! the output commands the service applies to the ports after each
//! event.  It is constructed once at boot and lives as long as the
//! device is powered.

use crate::config::DetectorConfig;
use crate::gate::RateGate;
use crate::motion::ThresholdBand;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One arm-to-detection measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Tick at which the session was armed.
    pub start_ms: u64,
    /// Tick at which motion was detected; `None` while still running.
    pub end_ms: Option<u64>,
}

impl Session {
    pub fn begin(now_ms: u64) -> Self {
        Self {
            start_ms: now_ms,
            end_ms: None,
        }
    }

    /// Close the session at `now_ms` and return the hold time in seconds.
    pub fn finish(&mut self, now_ms: u64) -> f32 {
        self.end_ms = Some(now_ms);
        now_ms.saturating_sub(self.start_ms) as f32 / 1000.0
    }
}

// ---------------------------------------------------------------------------
// Output commands (written by state handlers; applied by AppService)
// ---------------------------------------------------------------------------

/// Accelerometer update cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleInterval {
    Every(u32),
    /// No samples delivered (the "infinite" interval).
    Disabled,
}

/// Steady-state LED mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    On,
    Off,
}

/// Commands that state handlers write to request port actions.
///
/// `sample_interval` and `led_mode` are levels, re-applied only when they
/// change; `pulse_ms` and `publish_hold_time` are one-shots consumed on
/// apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputCommands {
    pub sample_interval: SampleInterval,
    pub led_mode: LedMode,
    pub pulse_ms: Option<u32>,
    pub publish_hold_time: Option<f32>,
}

impl Default for OutputCommands {
    fn default() -> Self {
        Self {
            sample_interval: SampleInterval::Disabled,
            led_mode: LedMode::Off,
            pulse_ms: None,
            publish_hold_time: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome of a single dispatched input
// ---------------------------------------------------------------------------

/// What a handler decided, for the service to turn into an `AppEvent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Press arrived inside the debounce window.
    PressIgnored { next_allowed_ms: u64 },
    /// Press accepted while already armed; the session restarted.
    Rearmed { start_ms: u64 },
    /// Session closed by a threshold crossing.
    HoldMeasured {
        hold_time_secs: f32,
        magnitude: f32,
        published: bool,
    },
    /// Sample delivered while idle.
    StraySample,
    /// Sample with a NaN axis.
    InvalidSample,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic tick of the input currently being handled.
    pub now_ms: u64,

    // -- Measurement --
    /// Active session; `Some` exactly while armed.
    pub session: Option<Session>,
    /// Magnitude of the most recently evaluated sample.
    pub last_magnitude: f32,
    /// Rest band derived from config.
    pub band: ThresholdBand,

    // -- Rate gates --
    pub debounce: RateGate,
    pub transmit: RateGate,

    // -- Outputs --
    pub commands: OutputCommands,
    pub outcome: Option<Outcome>,

    // -- Configuration --
    pub config: DetectorConfig,
}

impl FsmContext {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            now_ms: 0,
            session: None,
            last_magnitude: 0.0,
            band: ThresholdBand::from_config(&config),
            debounce: RateGate::new(u64::from(config.debounce_window_ms)),
            transmit: RateGate::new(u64::from(config.transmit_cooldown_ms)),
            commands: OutputCommands::default(),
            outcome: None,
            config,
        }
    }

    /// Milliseconds the current session has been running, if armed.
    pub fn session_elapsed_ms(&self) -> Option<u64> {
        self.session
            .map(|s| self.now_ms.saturating_sub(s.start_ms))
    }
}
