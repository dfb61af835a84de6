//! Short-horizon motion prediction.
//!
//! The formula path is always available. An accelerated [`Forecaster`] may be
//! loaded once at backend initialization; when it is missing or fails, callers
//! fall back to [`extrapolate`].

use std::fmt;

use thiserror::Error;

use super::DeviceContext;
use crate::input::{PredictedSampleSet, Sample};

/// Damping applied to each extrapolation step.
pub const REFERENCE_DAMPING: f32 = 0.8;

/// Maximum number of predicted samples per move event.
pub const MAX_HORIZON: usize = 3;

/// Number of real samples retained for prediction.
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Name of the optional native forecast library.
pub const NATIVE_FORECAST_LIBRARY: &str = "forecast";

/// Tuning for linear extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionParams {
    /// Velocity multiplier per step (0.0 pins predictions to the last sample)
    pub damping: f32,
    /// Number of samples to predict, at most [`MAX_HORIZON`]
    pub horizon: usize,
    /// Ring buffer capacity for real samples
    pub history_size: usize,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            damping: REFERENCE_DAMPING,
            horizon: MAX_HORIZON,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl PredictionParams {
    /// Parameters that never produce predictions.
    pub fn disabled() -> Self {
        Self {
            horizon: 0,
            ..Self::default()
        }
    }
}

/// Errors from the optional accelerated prediction path.
#[derive(Debug, Error)]
pub enum AccelError {
    #[error("native forecast library `{0}` is not available")]
    Unavailable(&'static str),

    #[error("forecaster rejected the sample history: {0}")]
    Failed(String),
}

/// Accelerated predictor backed by a vendor library.
pub trait Forecaster: fmt::Debug {
    /// Predicts up to `horizon` samples following `history` (oldest first).
    fn forecast(
        &mut self,
        history: &[Sample],
        horizon: usize,
    ) -> Result<PredictedSampleSet, AccelError>;
}

/// Resolves the accelerated path for a device.
pub type ForecasterLoader = fn(&DeviceContext) -> Result<Box<dyn Forecaster>, AccelError>;

/// Default loader. No native forecast library ships with this crate, so the
/// accelerated path is reported as unavailable and backends use the formula.
pub fn load_native_forecaster(_device: &DeviceContext) -> Result<Box<dyn Forecaster>, AccelError> {
    Err(AccelError::Unavailable(NATIVE_FORECAST_LIBRARY))
}

/// Linear extrapolation from the two most recent real samples.
///
/// With `velocity = last - previous`, the i-th prediction (1-based) sits at
/// `anchor + velocity * i * damping` and carries the anchor's pressure and tilt.
/// Timestamps advance by the observed sample interval.
pub fn extrapolate(
    previous: &Sample,
    last: &Sample,
    anchor: &Sample,
    params: &PredictionParams,
) -> PredictedSampleSet {
    let dx = last.x - previous.x;
    let dy = last.y - previous.y;
    let interval = last.timestamp.saturating_sub(previous.timestamp);

    (1..=params.horizon.min(MAX_HORIZON))
        .map(|i| {
            let step = i as f32 * params.damping;
            Sample {
                x: anchor.x + dx * step,
                y: anchor.y + dy * step,
                pressure: anchor.pressure,
                tilt_x: anchor.tilt_x,
                tilt_y: anchor.tilt_y,
                timestamp: anchor.timestamp.saturating_add(interval.saturating_mul(i as u64)),
            }
        })
        .collect()
}
