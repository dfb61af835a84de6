//! Compositor state: persistent surface, committed history and the live stroke.

use std::io::Write;

use log::warn;

use crate::draw::color::{BLACK, Color, WHITE};
use crate::draw::dirty::DirtyTracker;
use crate::draw::history::StrokeHistory;
use crate::draw::render::{render_polyline, render_prediction, render_strokes};
use crate::draw::stroke::{Stroke, bounding_box_for_points};
use crate::draw::surface::{CanvasError, RasterSnapshot, RasterSurface};
use crate::input::Sample;
use crate::util::Rect;

/// Alpha of the predicted-tail overlay (100 of 255).
pub const DEFAULT_PREDICTION_ALPHA: f64 = 100.0 / 255.0;

/// Width of the predicted-tail overlay as a fraction of the base width.
pub const DEFAULT_PREDICTION_WIDTH_FACTOR: f64 = 0.7;

/// Stroke lifecycle.
///
/// A stroke is `Active` from pen-down until pen-up; once committed it lives
/// only in the history.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeState {
    /// Pen is up, nothing in progress
    Idle,
    /// Pen is down and the polyline is growing
    Active {
        /// Vertices accumulated since pen-down
        points: Vec<(f64, f64)>,
    },
}

/// Initial parameters for a [`StrokeCompositor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositorSettings {
    /// Color the surface is cleared to
    pub background: Color,
    /// Ink color for new strokes
    pub color: Color,
    /// Width at which `pressure_width` scales, in pixels
    pub base_width: f64,
    /// Upper clamp for incoming pressure readings
    pub max_pressure: f32,
    /// Draw the predicted tail while a stroke is active
    pub show_prediction: bool,
    /// Overlay alpha multiplier for the predicted tail
    pub prediction_alpha: f64,
    /// Overlay width as a fraction of `base_width`
    pub prediction_width_factor: f64,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            background: WHITE,
            color: BLACK,
            base_width: 5.0,
            max_pressure: 1.0,
            show_prediction: true,
            prediction_alpha: DEFAULT_PREDICTION_ALPHA,
            prediction_width_factor: DEFAULT_PREDICTION_WIDTH_FACTOR,
        }
    }
}

/// Owns the raster surface and the stroke history that can rebuild it.
///
/// Committed strokes are baked into the surface at pen-up. The in-progress
/// stroke and its predicted tail are drawn only by [`compose`](Self::compose)
/// and never touch the surface, so undo can always rebuild the exact pixels
/// from background, base layer and history.
#[derive(Debug)]
pub struct StrokeCompositor {
    pub(super) surface: RasterSurface,
    pub(super) background: Color,
    /// Raster installed by `import_surface`, painted under the history
    pub(super) base_layer: Option<RasterSnapshot>,
    pub(super) history: StrokeHistory,
    pub(super) state: StrokeState,
    /// Width from the most recent Begin/Continue sample
    pub(super) render_width: f64,
    pub(super) predicted: Vec<Sample>,
    pub(super) color: Color,
    pub(super) base_width: f64,
    pub(super) max_pressure: f32,
    pub(super) show_prediction: bool,
    pub(super) prediction_alpha: f64,
    pub(super) prediction_width_factor: f64,
    /// Resize requested while a stroke was active
    pub(super) pending_resize: Option<(u32, u32)>,
    pub(super) dirty_tracker: DirtyTracker,
    pub(super) last_overlay_bounds: Option<Rect>,
    pub(super) needs_redraw: bool,
}

impl StrokeCompositor {
    /// Allocates a `width` x `height` surface cleared to the background color.
    pub fn new(width: u32, height: u32, settings: CompositorSettings) -> Result<Self, CanvasError> {
        let surface = RasterSurface::new(width, height)?;
        surface.fill(settings.background)?;

        let mut dirty_tracker = DirtyTracker::new();
        dirty_tracker.mark_full();

        Ok(Self {
            surface,
            background: settings.background,
            base_layer: None,
            history: StrokeHistory::new(),
            state: StrokeState::Idle,
            render_width: settings.base_width,
            predicted: Vec::new(),
            color: settings.color,
            base_width: settings.base_width,
            max_pressure: settings.max_pressure,
            show_prediction: settings.show_prediction,
            prediction_alpha: settings.prediction_alpha,
            prediction_width_factor: settings.prediction_width_factor,
            pending_resize: None,
            dirty_tracker,
            last_overlay_bounds: None,
            needs_redraw: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.history.as_slice()
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    /// Whether a stroke is between pen-down and pen-up.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Vertices of the in-progress stroke; empty while idle.
    pub fn active_points(&self) -> &[(f64, f64)] {
        match &self.state {
            StrokeState::Active { points } => points,
            StrokeState::Idle => &[],
        }
    }

    /// Width the in-progress stroke is drawn at.
    pub fn current_width(&self) -> f64 {
        self.render_width
    }

    /// Predicted samples from the latest Continue; cleared at stroke end.
    pub fn predicted(&self) -> &[Sample] {
        &self.predicted
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn base_width(&self) -> f64 {
        self.base_width
    }

    pub fn show_prediction(&self) -> bool {
        self.show_prediction
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Whether an imported raster sits under the history.
    pub fn has_base_layer(&self) -> bool {
        self.base_layer.is_some()
    }

    pub fn pending_resize(&self) -> Option<(u32, u32)> {
        self.pending_resize
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns whether a redraw was requested and resets the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Drains pending dirty rectangles for the current surface size.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        let width = self.width().min(i32::MAX as u32) as i32;
        let height = self.height().min(i32::MAX as u32) as i32;
        self.dirty_tracker.take_regions(width, height)
    }

    /// Draws the frame: persistent surface, then the live stroke, then the
    /// predicted tail on top.
    pub fn compose(&self, ctx: &cairo::Context) -> Result<(), CanvasError> {
        self.surface.paint_onto(ctx)?;

        if let StrokeState::Active { points } = &self.state {
            render_polyline(ctx, points, self.color, self.render_width);
            if self.show_prediction {
                render_prediction(
                    ctx,
                    points.last().copied(),
                    &self.predicted,
                    self.color.with_alpha(self.prediction_alpha),
                    self.prediction_width(),
                );
            }
        }
        Ok(())
    }

    /// Renders [`compose`](Self::compose) into a fresh raster.
    pub fn compose_snapshot(&self) -> Result<RasterSnapshot, CanvasError> {
        let frame = RasterSurface::new(self.width(), self.height())?;
        {
            let ctx = frame.context()?;
            self.compose(&ctx)?;
        }
        frame.snapshot()
    }

    /// Encodes the persistent surface (committed strokes only) as PNG.
    pub fn write_png<W: Write>(&self, stream: &mut W) -> Result<(), CanvasError> {
        self.surface.write_png(stream)
    }

    pub(super) fn prediction_width(&self) -> f64 {
        self.base_width * self.prediction_width_factor
    }

    /// Draws a freshly committed stroke onto the surface.
    pub(super) fn bake(&self, stroke: &Stroke) {
        match self.surface.context() {
            Ok(ctx) => render_strokes(&ctx, std::iter::once(stroke)),
            Err(err) => warn!("Failed to bake stroke into surface: {}", err),
        }
    }

    /// Repaints the surface from background, base layer and history.
    ///
    /// A base layer that fails to paint is skipped; the history is still replayed.
    pub(super) fn rebuild(&self) -> Result<(), CanvasError> {
        self.surface.fill(self.background)?;
        if let Some(base) = &self.base_layer {
            if let Err(err) = self.surface.paint_snapshot(base) {
                warn!("Skipping base layer during rebuild: {}", err);
            }
        }
        let ctx = self.surface.context()?;
        render_strokes(&ctx, self.history.as_slice());
        Ok(())
    }

    /// Marks the whole surface dirty and requests a redraw.
    pub(super) fn invalidate_all(&mut self) {
        self.dirty_tracker.mark_full();
        self.last_overlay_bounds = None;
        self.needs_redraw = true;
    }

    /// Marks the area previously covered by the live stroke overlay.
    pub(super) fn clear_overlay_dirty(&mut self) {
        if let Some(prev) = self.last_overlay_bounds.take() {
            self.dirty_tracker.mark_rect(prev);
        }
    }

    /// Updates tracked overlay bounds for dirty-region purposes.
    pub(super) fn update_overlay_dirty(&mut self) {
        let new_bounds = self.compute_overlay_bounds();
        let previous = self.last_overlay_bounds;

        if new_bounds != previous {
            if let Some(prev) = previous {
                self.dirty_tracker.mark_rect(prev);
            }
        }

        self.dirty_tracker.mark_optional_rect(new_bounds);
        self.last_overlay_bounds = new_bounds;
    }

    fn compute_overlay_bounds(&self) -> Option<Rect> {
        let StrokeState::Active { points } = &self.state else {
            return None;
        };

        let stroke_bounds = bounding_box_for_points(points, self.render_width);
        let tail_bounds = if self.show_prediction && !self.predicted.is_empty() {
            let tail: Vec<(f64, f64)> = points
                .last()
                .copied()
                .into_iter()
                .chain(self.predicted.iter().map(Sample::point))
                .collect();
            bounding_box_for_points(&tail, self.prediction_width())
        } else {
            None
        };

        match (stroke_bounds, tail_bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        }
    }
}
