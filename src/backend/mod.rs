//! Device capability backends.
//!
//! Each backend interprets raw pointer events for one device family and
//! optionally predicts where the pen is heading. [`BackendSelector`] probes the
//! registered backends once at startup and activates exactly one of them.

pub mod forecast;
pub mod generic;
pub mod vendor;

use std::fmt;

use log::{debug, info, warn};

use crate::input::{PredictedSampleSet, RawEvent, Sample};

pub use forecast::{AccelError, Forecaster, ForecasterLoader, PredictionParams};
pub use generic::GenericBackend;
pub use vendor::{OPPO_ONEPLUS, VendorBackend, VendorProfile};

/// Static identity of the device the engine runs on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceContext {
    /// Manufacturer string as reported by the platform
    pub manufacturer: String,
    /// Model string as reported by the platform
    pub model: String,
}

impl DeviceContext {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }

    /// Identity used when the platform reports nothing.
    pub fn unknown() -> Self {
        Self::new("unknown", "unknown")
    }
}

impl fmt::Display for DeviceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.model)
    }
}

/// Strategy for turning raw events of one device family into samples.
///
/// Every implementation applies the same pressure policy (see
/// [`normalize_pressure`](crate::input::normalize_pressure)).
pub trait CapabilityBackend: fmt::Debug {
    /// Idempotent setup. Never fails; unsupported devices simply stay unready.
    fn initialize(&mut self, device: &DeviceContext);

    /// Pure query of the device identity; valid before [`initialize`](Self::initialize).
    fn is_supported(&self, device: &DeviceContext) -> bool;

    /// Whether the backend may currently process events.
    fn is_initialized(&self) -> bool;

    /// Maps one raw event to a sample.
    fn process_event(&mut self, event: &RawEvent) -> Sample;

    /// Predicted samples following `current`; may be empty.
    fn predicted_samples(&mut self, current: &Sample) -> PredictedSampleSet;

    /// Forgets samples from the previous stroke. Called on every stroke begin.
    fn reset_prediction(&mut self) {}

    /// Releases backend-local state. Safe to call repeatedly.
    fn cleanup(&mut self);

    /// Diagnostic name; never used for behavioral branching.
    fn vendor_name(&self) -> &str;
}

/// Ordered list of candidate backends, most specific first.
#[derive(Debug)]
pub struct BackendSelector {
    candidates: Vec<Box<dyn CapabilityBackend>>,
}

impl BackendSelector {
    /// Creates a selector over `candidates` in priority order.
    ///
    /// The list should end with a universal backend; [`select`](Self::select)
    /// falls back to [`GenericBackend`] regardless.
    pub fn new(candidates: Vec<Box<dyn CapabilityBackend>>) -> Self {
        Self { candidates }
    }

    /// Registers every known vendor backend followed by the generic fallback.
    pub fn with_default_backends(params: PredictionParams) -> Self {
        Self::new(vec![
            Box::new(VendorBackend::oppo_oneplus(params)),
            Box::new(GenericBackend::new()),
        ])
    }

    /// Candidate names in probe order.
    pub fn candidate_names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.vendor_name()).collect()
    }

    /// Probes candidates in order and returns the first supported one.
    ///
    /// Consumes the selector: re-selection requires a new selector.
    pub fn select(self, device: &DeviceContext) -> Box<dyn CapabilityBackend> {
        for mut candidate in self.candidates {
            candidate.initialize(device);
            if candidate.is_supported(device) {
                info!(
                    "Selected input backend: {} (device: {device})",
                    candidate.vendor_name()
                );
                return candidate;
            }
            debug!("Backend {} does not support {device}", candidate.vendor_name());
            candidate.cleanup();
        }

        warn!("No supported input backend found for {device}, using generic");
        let mut fallback: Box<dyn CapabilityBackend> = Box::new(GenericBackend::new());
        fallback.initialize(device);
        fallback
    }
}
