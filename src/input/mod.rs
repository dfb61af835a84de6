//! Input normalization and stroke lifecycle dispatch.
//!
//! This module defines the raw platform event model, the normalized
//! [`Sample`] produced by capability backends, and the [`InputRouter`] that
//! turns platform actions into begin/continue/end stroke notifications.

pub mod events;
pub mod router;
pub mod sample;

// Re-export commonly used types at module level
pub use events::{AxisValues, RawAction, RawEvent, ToolType};
pub use router::{InputRouter, StrokePhase, StrokeSink};
pub use sample::{
    NEUTRAL_PRESSURE, PredictedSampleSet, STYLUS_PRESSURE_FLOOR, Sample, normalize_pressure,
};
