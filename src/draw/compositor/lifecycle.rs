use log::{debug, warn};

use crate::draw::stroke::{Stroke, StrokeStyle, pressure_width};
use crate::input::{Sample, StrokeSink};

use super::{StrokeCompositor, StrokeState};

impl StrokeCompositor {
    /// Pen-down: starts a new polyline at `sample`.
    ///
    /// A Begin that arrives mid-stroke discards the unfinished stroke.
    pub fn on_stroke_begin(&mut self, sample: Sample) {
        if let StrokeState::Active { points } = &self.state {
            debug!(
                "Stroke restarted before pen-up; dropping {} uncommitted vertices",
                points.len()
            );
        }

        self.state = StrokeState::Active {
            points: vec![sample.point()],
        };
        self.render_width = pressure_width(self.base_width, sample.pressure, self.max_pressure);
        self.predicted.clear();
        self.update_overlay_dirty();
        self.needs_redraw = true;
    }

    /// Pen-move: extends the polyline and replaces the predicted tail.
    pub fn on_stroke_continue(&mut self, sample: Sample, predicted: &[Sample]) {
        let StrokeState::Active { points } = &mut self.state else {
            debug!("Ignoring stroke continue while idle");
            return;
        };

        points.push(sample.point());
        self.render_width = pressure_width(self.base_width, sample.pressure, self.max_pressure);
        self.predicted.clear();
        self.predicted.extend_from_slice(predicted);
        self.update_overlay_dirty();
        self.needs_redraw = true;
    }

    /// Pen-up: appends the final vertex and commits the stroke.
    ///
    /// The committed width is the one set by the latest Begin/Continue; the
    /// final sample's pressure only contributes its position.
    pub fn on_stroke_end(&mut self, sample: Sample) {
        let StrokeState::Active { mut points } =
            std::mem::replace(&mut self.state, StrokeState::Idle)
        else {
            debug!("Ignoring stroke end while idle");
            return;
        };

        points.push(sample.point());
        let stroke = Stroke::new(
            points,
            StrokeStyle {
                color: self.color,
                width: self.render_width,
            },
        );

        self.bake(&stroke);
        self.clear_overlay_dirty();
        self.dirty_tracker.mark_stroke(&stroke);
        self.history.push(stroke);
        self.predicted.clear();
        self.needs_redraw = true;

        if let Some((width, height)) = self.pending_resize.take() {
            if let Err(err) = self.apply_resize(width, height) {
                warn!("Deferred resize to {}x{} failed: {}", width, height, err);
            }
        }
    }
}

impl StrokeSink for StrokeCompositor {
    fn stroke_begin(&mut self, sample: Sample) {
        self.on_stroke_begin(sample);
    }

    fn stroke_continue(&mut self, sample: Sample, predicted: &[Sample]) {
        self.on_stroke_continue(sample, predicted);
    }

    fn stroke_end(&mut self, sample: Sample) {
        self.on_stroke_end(sample);
    }
}
