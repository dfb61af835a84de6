//! Dispatch from raw platform events to the stroke lifecycle.

use log::{debug, warn};

use super::events::{RawAction, RawEvent};
use super::sample::Sample;
use crate::backend::{BackendSelector, CapabilityBackend, DeviceContext};

/// Stroke lifecycle transition derived from a platform action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePhase {
    Begin,
    Continue,
    End,
}

impl StrokePhase {
    /// Classifies a platform action; anything other than down/move/up is ignored.
    pub fn classify(action: RawAction) -> Option<Self> {
        match action {
            RawAction::Down => Some(Self::Begin),
            RawAction::Move => Some(Self::Continue),
            RawAction::Up => Some(Self::End),
            RawAction::Cancel | RawAction::HoverMove | RawAction::Other => None,
        }
    }
}

/// Receiver of stroke lifecycle notifications.
pub trait StrokeSink {
    fn stroke_begin(&mut self, sample: Sample);
    fn stroke_continue(&mut self, sample: Sample, predicted: &[Sample]);
    fn stroke_end(&mut self, sample: Sample);
}

/// Pure dispatcher between the platform event source and a [`StrokeSink`].
///
/// Holds the single active backend; performs no buffering of its own.
#[derive(Debug)]
pub struct InputRouter {
    backend: Box<dyn CapabilityBackend>,
}

impl InputRouter {
    /// Wraps an already selected backend.
    pub fn new(backend: Box<dyn CapabilityBackend>) -> Self {
        Self { backend }
    }

    /// Runs `selector` against `device` and routes through the winner.
    pub fn select(selector: BackendSelector, device: &DeviceContext) -> Self {
        Self::new(selector.select(device))
    }

    /// Name of the active backend.
    pub fn active_vendor(&self) -> &str {
        self.backend.vendor_name()
    }

    /// Handles one raw event. Returns true if the event was consumed.
    pub fn handle(&mut self, event: &RawEvent, sink: &mut impl StrokeSink) -> bool {
        let Some(phase) = StrokePhase::classify(event.action) else {
            debug!("Ignoring {:?} event", event.action);
            return false;
        };

        if !self.backend.is_initialized() {
            warn!(
                "Backend {} is not initialized; dropping {:?} event",
                self.backend.vendor_name(),
                event.action
            );
            return false;
        }

        match phase {
            StrokePhase::Begin => {
                self.backend.reset_prediction();
                let sample = self.backend.process_event(event);
                sink.stroke_begin(sample);
            }
            StrokePhase::Continue => {
                let sample = self.backend.process_event(event);
                let predicted = self.backend.predicted_samples(&sample);
                sink.stroke_continue(sample, &predicted);
            }
            StrokePhase::End => {
                let sample = self.backend.process_event(event);
                sink.stroke_end(sample);
            }
        }
        true
    }

    /// Re-initializes the active backend after [`cleanup`](Self::cleanup).
    pub fn resume(&mut self, device: &DeviceContext) {
        self.backend.initialize(device);
    }

    /// Releases the active backend's state.
    pub fn cleanup(&mut self) {
        self.backend.cleanup();
    }
}
