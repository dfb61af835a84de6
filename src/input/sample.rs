//! Normalized input samples and the shared pressure policy.

use super::events::{RawEvent, ToolType};

/// Lowest pressure a stylus sample may carry; light contact still leaves ink.
pub const STYLUS_PRESSURE_FLOOR: f32 = 0.1;

/// Pressure substituted for tools whose pressure reporting is unreliable.
pub const NEUTRAL_PRESSURE: f32 = 0.5;

/// One normalized input reading.
///
/// Samples are plain values: once a backend produces one it is never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    /// Nominally within `[0, 1]`; not hard-clamped.
    pub pressure: f32,
    pub tilt_x: f32,
    pub tilt_y: f32,
    /// Monotonic timestamp in milliseconds.
    pub timestamp: u64,
}

impl Sample {
    /// Creates an untilted sample.
    pub fn new(x: f32, y: f32, pressure: f32, timestamp: u64) -> Self {
        Self {
            x,
            y,
            pressure,
            tilt_x: 0.0,
            tilt_y: 0.0,
            timestamp,
        }
    }

    /// Builds a sample from a raw event, applying [`normalize_pressure`] and
    /// reading tilt only when the platform reports a non-zero tilt axis.
    pub fn from_raw(event: &RawEvent) -> Self {
        let (tilt_x, tilt_y) = if event.axes.tilt != 0.0 {
            (event.axes.tilt, event.axes.orientation)
        } else {
            (0.0, 0.0)
        };

        Self {
            x: event.x,
            y: event.y,
            pressure: normalize_pressure(event.tool, event.pressure),
            tilt_x,
            tilt_y,
            timestamp: event.event_time,
        }
    }

    /// Returns the position as a pair of `f64` for rendering.
    pub fn point(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// Short-horizon extrapolated samples for the active stroke (0..=3 entries).
pub type PredictedSampleSet = Vec<Sample>;

/// Applies the pressure policy shared by every capability backend.
///
/// Stylus pressure passes through, floored at [`STYLUS_PRESSURE_FLOOR`].
/// Every other tool reports [`NEUTRAL_PRESSURE`].
pub fn normalize_pressure(tool: ToolType, raw: f32) -> f32 {
    match tool {
        // `max` also maps a NaN reading to the floor
        ToolType::Stylus => raw.max(STYLUS_PRESSURE_FLOOR),
        ToolType::Finger | ToolType::Unknown => NEUTRAL_PRESSURE,
    }
}
