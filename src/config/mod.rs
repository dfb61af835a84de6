//! Configuration file support for inkslate.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/inkslate/config.toml`. Settings include ink defaults,
//! prediction tuning, the fallback canvas size and device identity overrides.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{CanvasConfig, DeviceConfig, DrawingConfig, PredictionConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{DeviceContext, PredictionParams};
use crate::draw::CompositorSettings;
use crate::draw::surface::MAX_SURFACE_EDGE;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "black"
/// background_color = "white"
/// base_width = 5.0
///
/// [prediction]
/// enabled = true
/// damping = 0.8
/// horizon = 3
///
/// [canvas]
/// width = 1280
/// height = 800
///
/// [device]
/// manufacturer = "OnePlus"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Ink and background defaults
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Prediction tuning for capable backends
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Canvas size when none is given on the command line
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Device identity overrides
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `base_width`: 0.5 - 100.0
    /// - `max_pressure`: 1.0 - 4.0
    /// - `damping`: 0.0 - 1.0
    /// - `horizon`: 0 - 3
    /// - `history_size`: 2 - 64
    /// - `overlay_alpha`: 0.0 - 1.0
    /// - `overlay_width_factor`: 0.1 - 2.0
    /// - canvas `width` / `height`: 1 - 16384
    pub fn validate_and_clamp(&mut self) {
        // Base width: 0.5 - 100.0
        if !(0.5..=100.0).contains(&self.drawing.base_width) {
            log::warn!(
                "Invalid base_width {:.1}, clamping to 0.5-100.0 range",
                self.drawing.base_width
            );
            self.drawing.base_width = if self.drawing.base_width.is_nan() {
                0.5
            } else {
                self.drawing.base_width.clamp(0.5, 100.0)
            };
        }

        // Max pressure: 1.0 - 4.0
        if !(1.0..=4.0).contains(&self.drawing.max_pressure) {
            log::warn!(
                "Invalid max_pressure {:.2}, clamping to 1.0-4.0 range",
                self.drawing.max_pressure
            );
            self.drawing.max_pressure = if self.drawing.max_pressure.is_nan() {
                1.0
            } else {
                self.drawing.max_pressure.clamp(1.0, 4.0)
            };
        }

        // Damping: 0.0 - 1.0
        if !(0.0..=1.0).contains(&self.prediction.damping) {
            log::warn!(
                "Invalid prediction damping {:.2}, clamping to 0.0-1.0 range",
                self.prediction.damping
            );
            self.prediction.damping = if self.prediction.damping.is_nan() {
                crate::backend::forecast::REFERENCE_DAMPING
            } else {
                self.prediction.damping.clamp(0.0, 1.0)
            };
        }

        // Horizon: 0 - 3
        let max_horizon = crate::backend::forecast::MAX_HORIZON;
        if self.prediction.horizon > max_horizon {
            log::warn!(
                "Invalid prediction horizon {}, clamping to 0-{} range",
                self.prediction.horizon,
                max_horizon
            );
            self.prediction.horizon = max_horizon;
        }

        // History size: 2 - 64
        if !(2..=64).contains(&self.prediction.history_size) {
            log::warn!(
                "Invalid prediction history_size {}, clamping to 2-64 range",
                self.prediction.history_size
            );
            self.prediction.history_size = self.prediction.history_size.clamp(2, 64);
        }

        // Overlay alpha: 0.0 - 1.0
        if !(0.0..=1.0).contains(&self.prediction.overlay_alpha) {
            log::warn!(
                "Invalid overlay_alpha {:.3}, clamping to 0.0-1.0 range",
                self.prediction.overlay_alpha
            );
            self.prediction.overlay_alpha = if self.prediction.overlay_alpha.is_nan() {
                crate::draw::compositor::DEFAULT_PREDICTION_ALPHA
            } else {
                self.prediction.overlay_alpha.clamp(0.0, 1.0)
            };
        }

        // Overlay width factor: 0.1 - 2.0
        if !(0.1..=2.0).contains(&self.prediction.overlay_width_factor) {
            log::warn!(
                "Invalid overlay_width_factor {:.2}, clamping to 0.1-2.0 range",
                self.prediction.overlay_width_factor
            );
            let factor = self.prediction.overlay_width_factor;
            self.prediction.overlay_width_factor = if factor.is_nan() {
                crate::draw::compositor::DEFAULT_PREDICTION_WIDTH_FACTOR
            } else {
                factor.clamp(0.1, 2.0)
            };
        }

        // Canvas size: 1 - 16384
        if !(1..=MAX_SURFACE_EDGE).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 1-{} range",
                self.canvas.width,
                MAX_SURFACE_EDGE
            );
            self.canvas.width = self.canvas.width.clamp(1, MAX_SURFACE_EDGE);
        }
        if !(1..=MAX_SURFACE_EDGE).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 1-{} range",
                self.canvas.height,
                MAX_SURFACE_EDGE
            );
            self.canvas.height = self.canvas.height.clamp(1, MAX_SURFACE_EDGE);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/inkslate/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("inkslate");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates the configuration file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Initial compositor parameters derived from `[drawing]` and `[prediction]`.
    pub fn compositor_settings(&self) -> CompositorSettings {
        CompositorSettings {
            background: self.drawing.background_color.to_color(),
            color: self.drawing.default_color.to_color(),
            base_width: self.drawing.base_width,
            max_pressure: self.drawing.max_pressure,
            show_prediction: self.prediction.enabled && self.prediction.show_overlay,
            prediction_alpha: self.prediction.overlay_alpha,
            prediction_width_factor: self.prediction.overlay_width_factor,
        }
    }

    /// Prediction parameters for capable backends.
    ///
    /// Disabled prediction maps to a zero horizon.
    pub fn prediction_params(&self) -> PredictionParams {
        if !self.prediction.enabled {
            return PredictionParams::disabled();
        }
        PredictionParams {
            damping: self.prediction.damping,
            horizon: self.prediction.horizon,
            history_size: self.prediction.history_size,
        }
    }

    /// Applies `[device]` overrides on top of a detected identity.
    pub fn device_context(&self, detected: DeviceContext) -> DeviceContext {
        DeviceContext {
            manufacturer: self
                .device
                .manufacturer
                .clone()
                .unwrap_or(detected.manufacturer),
            model: self.device.model.clone().unwrap_or(detected.model),
        }
    }
}
