//! Detector configuration parameters
//!
//! All tunable timing and threshold parameters for the still-position
//! detector. Nothing here is persisted; firmware may apply a compile-time
//! JSON override (see [`DetectorConfig::from_json`]).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Name announced in the radio pairing request.
pub const DEFAULT_NODE_NAME: &str = "still-position-detector";

/// Core detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    // --- Sampling ---
    /// Accelerometer sample period while armed (milliseconds)
    pub sample_interval_ms: u32,

    // --- Rest band ---
    /// Magnitude (g) above which the device counts as moved
    pub upper_threshold_g: f32,
    /// Magnitude (g) below which the device counts as moved
    pub lower_threshold_g: f32,

    // --- Rate limits ---
    /// Minimum spacing between accepted button presses (milliseconds)
    pub debounce_window_ms: u32,
    /// Minimum spacing between hold-time publishes (milliseconds)
    pub transmit_cooldown_ms: u32,

    // --- Indicator ---
    /// LED pulse emitted alongside a hold-time publish (milliseconds)
    pub transmit_pulse_ms: u32,
    /// LED pulse emitted once at boot (milliseconds)
    pub boot_pulse_ms: u32,

    // --- Telemetry ---
    /// Battery voltage report interval (milliseconds)
    pub battery_update_interval_ms: u32,
    /// Radio housekeeping interval (milliseconds)
    pub housekeeping_interval_ms: u32,

    // --- Supervision ---
    /// Task watchdog timeout; the event loop must feed it faster (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Identity ---
    /// Node name sent with the pairing request
    pub node_name: heapless::String<32>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let mut node_name = heapless::String::new();
        // Fits: the constant is shorter than the capacity.
        let _ = node_name.push_str(DEFAULT_NODE_NAME);

        Self {
            // Sampling
            sample_interval_ms: 40, // 25 Hz

            // Rest band around 1 g
            upper_threshold_g: 1.19,
            lower_threshold_g: 0.95,

            // Rate limits
            debounce_window_ms: 600,
            transmit_cooldown_ms: 10_000,

            // Indicator
            transmit_pulse_ms: 100,
            boot_pulse_ms: 2000,

            // Telemetry
            battery_update_interval_ms: 60 * 60 * 1000, // 1/hour
            housekeeping_interval_ms: 1000,

            // Supervision
            watchdog_timeout_ms: 10_000,

            node_name,
        }
    }
}

impl DetectorConfig {
    /// Parse a (possibly partial) JSON document. Missing fields keep their
    /// defaults; the result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply an optional JSON override on top of the defaults.  A document
    /// that fails to parse or validate is logged and ignored.
    pub fn with_override(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                info!("Config: override applied");
                config
            }
            Err(e) => {
                warn!("Config: override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject values that would make the state machine misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.lower_threshold_g.is_finite() || !self.upper_threshold_g.is_finite() {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if self.lower_threshold_g <= 0.0 {
            return Err(ConfigError::ValidationFailed("lower_threshold_g must be positive"));
        }
        if self.lower_threshold_g >= self.upper_threshold_g {
            return Err(ConfigError::ValidationFailed(
                "lower_threshold_g must be below upper_threshold_g",
            ));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample_interval_ms must be non-zero"));
        }
        // A zero window lets two presses, or two publishes, share one tick.
        if self.debounce_window_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_window_ms must be non-zero"));
        }
        if self.transmit_cooldown_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "transmit_cooldown_ms must be non-zero",
            ));
        }
        if self.battery_update_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "battery_update_interval_ms must be non-zero",
            ));
        }
        if self.housekeeping_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "housekeeping_interval_ms must be non-zero",
            ));
        }
        if self.watchdog_timeout_ms <= self.housekeeping_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must exceed housekeeping_interval_ms",
            ));
        }
        if self.node_name.is_empty() {
            return Err(ConfigError::ValidationFailed("node_name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = DetectorConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.lower_threshold_g < 1.0 && c.upper_threshold_g > 1.0);
        assert_eq!(c.node_name.as_str(), DEFAULT_NODE_NAME);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = DetectorConfig::default();
        assert!(
            c.sample_interval_ms < c.debounce_window_ms,
            "several samples should fit inside one debounce window"
        );
        assert!(
            c.debounce_window_ms < c.transmit_cooldown_ms,
            "radio cooldown should be longer than press debounce"
        );
        assert!(c.transmit_cooldown_ms < c.battery_update_interval_ms);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = DetectorConfig::from_json(r#"{"transmit_cooldown_ms": 5000}"#).unwrap();
        assert_eq!(c.transmit_cooldown_ms, 5000);
        assert_eq!(c.debounce_window_ms, 600);
        assert!((c.upper_threshold_g - 1.19).abs() < f32::EPSILON);
    }

    #[test]
    fn inverted_band_rejected() {
        let err = DetectorConfig::from_json(
            r#"{"lower_threshold_g": 1.3, "upper_threshold_g": 1.1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }

    #[test]
    fn malformed_json_is_corrupted() {
        assert!(matches!(
            DetectorConfig::from_json("{not json"),
            Err(ConfigError::Corrupted)
        ));
    }

    #[test]
    fn override_falls_back_to_defaults() {
        assert_eq!(DetectorConfig::with_override(None), DetectorConfig::default());
        assert_eq!(
            DetectorConfig::with_override(Some(r#"{"sample_interval_ms": 0}"#)),
            DetectorConfig::default()
        );
        let c = DetectorConfig::with_override(Some(r#"{"debounce_window_ms": 800}"#));
        assert_eq!(c.debounce_window_ms, 800);
    }

    #[test]
    fn zero_sample_interval_rejected() {
        let c = DetectorConfig {
            sample_interval_ms: 0,
            ..DetectorConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_debounce_window_rejected() {
        let err = DetectorConfig::from_json(r#"{"debounce_window_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }

    #[test]
    fn zero_transmit_cooldown_rejected() {
        let err = DetectorConfig::from_json(r#"{"transmit_cooldown_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
        assert_eq!(
            DetectorConfig::with_override(Some(
                r#"{"debounce_window_ms": 0, "transmit_cooldown_ms": 0}"#
            )),
            DetectorConfig::default()
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = DetectorConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }
}
