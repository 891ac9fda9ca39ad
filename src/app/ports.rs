//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (accelerometer, LED, radio, battery monitor, clock,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.
//!
//! Every port call is fire-and-forget from the core's point of view except
//! [`BatteryPort::voltage`], whose failure the telemetry relay skips.

use crate::error::BatteryError;

pub use crate::fsm::context::{LedMode, SampleInterval};

/// Topic under which hold times are published.
pub const HOLD_TIME_TOPIC: &str = "hold-time";

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Never decreases.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Accelerometer port (domain → sensor driver)
// ───────────────────────────────────────────────────────────────

/// Controls the accelerometer update cadence.  Samples themselves arrive
/// as [`Event::SampleReady`](crate::events::Event::SampleReady).
pub trait AccelerometerPort {
    fn set_sample_interval(&mut self, interval: SampleInterval);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → LED)
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    /// Set the steady-state LED mode.
    fn set_mode(&mut self, mode: LedMode);

    /// Light the LED for `duration_ms`, then fall back to the mode.
    fn pulse(&mut self, duration_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Radio port (domain → radio stack)
// ───────────────────────────────────────────────────────────────

/// Best-effort, unacknowledged radio publishes.
pub trait RadioPort {
    /// One-shot pairing announcement at boot.
    fn pairing_request(&mut self, name: &str, version: &str);

    /// Publish a float under `topic`.
    fn publish_float(&mut self, topic: &str, value: f32);

    /// Publish the battery voltage on the battery-status topic.
    fn publish_battery(&mut self, voltage: f32);

    /// Periodic housekeeping (flush outbox, keep pairing alive).
    fn poll(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Battery port (power monitor → domain)
// ───────────────────────────────────────────────────────────────

pub trait BatteryPort {
    /// Current battery voltage in volts.
    fn voltage(&mut self) -> Result<f32, BatteryError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Device bundle
// ───────────────────────────────────────────────────────────────

/// Everything the service drives on one device.  Blanket-implemented so a
/// single hardware adapter (or mock) satisfies it without a double
/// mutable borrow.
pub trait DevicePorts: AccelerometerPort + IndicatorPort + RadioPort + BatteryPort {}

impl<T> DevicePorts for T where T: AccelerometerPort + IndicatorPort + RadioPort + BatteryPort {}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples timers from the event queue)
// ───────────────────────────────────────────────────────────────

/// Identity of a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Accelerometer sample cadence (only runs while armed).
    Sampling,
    /// Battery voltage report.
    Battery,
    /// Radio housekeeping.
    Housekeeping,
}

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// timer fires.  The main loop implements it by pushing events.
pub trait TimerDelegate {
    fn on_timer_fired(&mut self, timer: TimerId);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading or validating a [`DetectorConfig`](crate::config::DetectorConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Document failed to parse.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
