//! Universal fallback backend.

use super::{CapabilityBackend, DeviceContext};
use crate::input::{PredictedSampleSet, RawEvent, Sample};

/// Works on every device; applies the pressure policy and never predicts.
#[derive(Debug, Default)]
pub struct GenericBackend {
    initialized: bool,
}

impl GenericBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapabilityBackend for GenericBackend {
    fn initialize(&mut self, _device: &DeviceContext) {
        self.initialized = true;
    }

    fn is_supported(&self, _device: &DeviceContext) -> bool {
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process_event(&mut self, event: &RawEvent) -> Sample {
        Sample::from_raw(event)
    }

    fn predicted_samples(&mut self, _current: &Sample) -> PredictedSampleSet {
        Vec::new()
    }

    fn cleanup(&mut self) {
        self.initialized = false;
    }

    fn vendor_name(&self) -> &str {
        "Generic"
    }
}
