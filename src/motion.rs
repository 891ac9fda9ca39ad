//! Acceleration samples and the rest-band threshold policy.
//!
//! A device held steady reads ~1 g (gravity only).  Picking it up or
//! setting it down pushes the magnitude out of the rest band in one
//! direction or the other, and that is what ends a measurement.

use crate::config::DetectorConfig;

/// One three-axis reading, in units of standard gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the acceleration vector.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// A NaN axis makes the magnitude unordered against any threshold.
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

/// Classification of a sample against the rest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// Magnitude inside `[lower, upper]`.
    Still,
    /// Magnitude above `upper` or below `lower`.
    Moved,
}

/// Closed interval of magnitudes considered "held still".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub lower_g: f32,
    pub upper_g: f32,
}

impl ThresholdBand {
    pub const fn new(lower_g: f32, upper_g: f32) -> Self {
        Self { lower_g, upper_g }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.lower_threshold_g, config.upper_threshold_g)
    }

    /// Both band edges count as still.
    pub fn classify(&self, magnitude: f32) -> MotionStatus {
        if magnitude > self.upper_g || magnitude < self.lower_g {
            MotionStatus::Moved
        } else {
            MotionStatus::Still
        }
    }

    pub fn is_crossing(&self, magnitude: f32) -> bool {
        self.classify(magnitude) == MotionStatus::Moved
    }
}

impl Default for ThresholdBand {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}
