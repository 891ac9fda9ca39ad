//! Unified error types for the still-position detector firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the top-level loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the event loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The accelerometer could not be read or returned garbage.
    Sensor(SensorError),
    /// Battery voltage could not be measured.
    Battery(BatteryError),
    /// The radio stack rejected or dropped a message.
    Radio(RadioError),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Battery(e) => write!(f, "battery: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction with the accelerometer failed.
    BusFailed,
    /// WHO_AM_I did not match the expected device.
    UnexpectedDevice(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFailed => write!(f, "I2C bus transaction failed"),
            Self::UnexpectedDevice(id) => write!(f, "unexpected device id 0x{id:02x}"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Battery errors
// ---------------------------------------------------------------------------

/// Battery reads are transient: the relay logs and skips on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryError {
    /// The monitor has no valid reading (ADC error, module absent).
    Unavailable,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for BatteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "voltage unavailable"),
            Self::OutOfRange => write!(f, "voltage out of range"),
        }
    }
}

impl From<BatteryError> for Error {
    fn from(e: BatteryError) -> Self {
        Self::Battery(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Payload could not be encoded into the outgoing buffer.
    EncodeFailed,
    /// The underlying transport refused the write.
    TransportFailed,
    /// The outbox was full and a message had to be discarded.
    OutboxFull,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodeFailed => write!(f, "payload encode failed"),
            Self::TransportFailed => write!(f, "transport write failed"),
            Self::OutboxFull => write!(f, "outbox full"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
