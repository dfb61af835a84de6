//! Vendor-family backends with motion prediction.

use std::collections::VecDeque;

use log::{info, warn};

use super::forecast::{self, Forecaster, ForecasterLoader, PredictionParams};
use super::{CapabilityBackend, DeviceContext};
use crate::input::{PredictedSampleSet, RawEvent, Sample};

/// Static identity of a device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorProfile {
    /// Display name used for diagnostics
    pub name: &'static str,
    /// Lowercase substrings matched against the device manufacturer
    pub manufacturer_markers: &'static [&'static str],
}

impl VendorProfile {
    /// Returns true when the device manufacturer contains any marker.
    pub fn matches(&self, device: &DeviceContext) -> bool {
        let manufacturer = device.manufacturer.to_lowercase();
        self.manufacturer_markers
            .iter()
            .any(|marker| manufacturer.contains(marker))
    }
}

/// OPPO and OnePlus share the same stylus stack.
pub const OPPO_ONEPLUS: VendorProfile = VendorProfile {
    name: "OPPO/OnePlus",
    manufacturer_markers: &["oppo", "oneplus"],
};

/// Backend for a vendor family that exposes usable pen prediction.
///
/// Keeps a bounded ring buffer of real samples from the active stroke and
/// extrapolates from its two newest entries, or delegates to an accelerated
/// [`Forecaster`] when one loaded during [`initialize`](CapabilityBackend::initialize).
#[derive(Debug)]
pub struct VendorBackend {
    profile: VendorProfile,
    params: PredictionParams,
    history: VecDeque<Sample>,
    initialized: bool,
    loader: ForecasterLoader,
    accelerator: Option<Box<dyn Forecaster>>,
}

impl VendorBackend {
    /// Creates a backend for `profile` using the default native loader.
    pub fn new(profile: VendorProfile, params: PredictionParams) -> Self {
        Self::with_loader(profile, params, forecast::load_native_forecaster)
    }

    /// Creates an OPPO/OnePlus backend.
    pub fn oppo_oneplus(params: PredictionParams) -> Self {
        Self::new(OPPO_ONEPLUS, params)
    }

    /// Creates a backend with a custom accelerated-path loader.
    pub fn with_loader(
        profile: VendorProfile,
        params: PredictionParams,
        loader: ForecasterLoader,
    ) -> Self {
        let history_size = params.history_size.max(2);
        Self {
            profile,
            params: PredictionParams {
                history_size,
                ..params
            },
            history: VecDeque::with_capacity(history_size),
            initialized: false,
            loader,
            accelerator: None,
        }
    }

    /// Number of real samples currently retained for prediction.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether the accelerated forecaster is in use.
    pub fn accelerated(&self) -> bool {
        self.accelerator.is_some()
    }

    fn remember(&mut self, sample: Sample) {
        if self.history.len() == self.params.history_size {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    fn accelerated_forecast(&mut self) -> Option<PredictedSampleSet> {
        let forecaster = self.accelerator.as_mut()?;
        match forecaster.forecast(self.history.make_contiguous(), self.params.horizon) {
            Ok(mut predicted) => {
                predicted.truncate(self.params.horizon.min(forecast::MAX_HORIZON));
                Some(predicted)
            }
            Err(err) => {
                warn!(
                    "{}: accelerated forecast failed ({err}); using extrapolation",
                    self.profile.name
                );
                self.accelerator = None;
                None
            }
        }
    }
}

impl CapabilityBackend for VendorBackend {
    fn initialize(&mut self, device: &DeviceContext) {
        if self.initialized || !self.is_supported(device) {
            return;
        }
        self.initialized = true;

        match (self.loader)(device) {
            Ok(forecaster) => {
                info!("{}: accelerated forecasting enabled", self.profile.name);
                self.accelerator = Some(forecaster);
            }
            Err(err) => {
                warn!("{}: {err}, using extrapolation fallback", self.profile.name);
                self.accelerator = None;
            }
        }
    }

    fn is_supported(&self, device: &DeviceContext) -> bool {
        self.profile.matches(device)
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process_event(&mut self, event: &RawEvent) -> Sample {
        let sample = Sample::from_raw(event);
        self.remember(sample);
        sample
    }

    fn predicted_samples(&mut self, current: &Sample) -> PredictedSampleSet {
        if self.params.horizon == 0 || self.history.len() < 2 {
            return Vec::new();
        }
        if let Some(predicted) = self.accelerated_forecast() {
            return predicted;
        }

        let last = self.history[self.history.len() - 1];
        let previous = self.history[self.history.len() - 2];
        forecast::extrapolate(&previous, &last, current, &self.params)
    }

    fn reset_prediction(&mut self) {
        self.history.clear();
    }

    fn cleanup(&mut self) {
        self.history.clear();
        self.accelerator = None;
        self.initialized = false;
    }

    fn vendor_name(&self) -> &str {
        self.profile.name
    }
}
