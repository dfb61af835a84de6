//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the ink the compositor starts with. Color and width can still be
/// changed at runtime (for example from a replay script).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Color the canvas is cleared to
    #[serde(default = "default_background")]
    pub background_color: ColorSpec,

    /// Base stroke width in pixels before pressure scaling (valid range: 0.5 - 100.0)
    #[serde(default = "default_base_width")]
    pub base_width: f64,

    /// Pressure readings above this value are clamped (valid range: 1.0 - 4.0)
    #[serde(default = "default_max_pressure")]
    pub max_pressure: f32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            background_color: default_background(),
            base_width: default_base_width(),
            max_pressure: default_max_pressure(),
        }
    }
}

/// Stroke prediction settings.
///
/// Only backends with a prediction capability use these; the generic backend
/// never predicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionConfig {
    /// Ask capable backends for predicted samples
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Draw the predicted tail while a stroke is in progress
    #[serde(default = "default_true")]
    pub show_overlay: bool,

    /// Velocity multiplier per predicted step (valid range: 0.0 - 1.0)
    #[serde(default = "default_damping")]
    pub damping: f32,

    /// Number of samples predicted ahead (valid range: 0 - 3)
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Real samples kept for prediction (valid range: 2 - 64)
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Opacity multiplier of the predicted tail (valid range: 0.0 - 1.0)
    #[serde(default = "default_overlay_alpha")]
    pub overlay_alpha: f64,

    /// Tail width as a fraction of the base width (valid range: 0.1 - 2.0)
    #[serde(default = "default_overlay_width_factor")]
    pub overlay_width_factor: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            show_overlay: default_true(),
            damping: default_damping(),
            horizon: default_horizon(),
            history_size: default_history_size(),
            overlay_alpha: default_overlay_alpha(),
            overlay_width_factor: default_overlay_width_factor(),
        }
    }
}

/// Canvas size used when no view dimensions are supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// Device identity overrides.
///
/// Leave unset to detect the manufacturer and model from the system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceConfig {
    /// Manufacturer string matched against vendor backends (e.g., "OnePlus")
    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Model string reported alongside the manufacturer
    #[serde(default)]
    pub model: Option<String>,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_base_width() -> f64 {
    5.0
}

fn default_max_pressure() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_damping() -> f32 {
    crate::backend::forecast::REFERENCE_DAMPING
}

fn default_horizon() -> usize {
    crate::backend::forecast::MAX_HORIZON
}

fn default_history_size() -> usize {
    crate::backend::forecast::DEFAULT_HISTORY_SIZE
}

fn default_overlay_alpha() -> f64 {
    crate::draw::compositor::DEFAULT_PREDICTION_ALPHA
}

fn default_overlay_width_factor() -> f64 {
    crate::draw::compositor::DEFAULT_PREDICTION_WIDTH_FACTOR
}

fn default_canvas_width() -> u32 {
    1280
}

fn default_canvas_height() -> u32 {
    800
}
