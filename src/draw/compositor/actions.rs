use log::{debug, info, warn};

use crate::draw::color::Color;
use crate::draw::surface::{CanvasError, RasterSnapshot, RasterSurface, checked_dimensions};

use super::{StrokeCompositor, StrokeState};

impl StrokeCompositor {
    /// Removes the most recent committed stroke and rebuilds the surface.
    ///
    /// Returns `false` (and touches nothing) when the history is empty.
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            debug!("Undo requested with empty history");
            return false;
        }

        if let Err(err) = self.rebuild() {
            warn!("Failed to rebuild surface after undo: {}", err);
        }
        self.invalidate_all();
        true
    }

    /// Drops every committed stroke, the in-progress stroke and any imported
    /// base layer. Events for the abandoned stroke are ignored until the next Begin.
    pub fn clear(&mut self) {
        self.history.clear();
        self.base_layer = None;
        self.state = StrokeState::Idle;
        self.predicted.clear();
        if let Err(err) = self.surface.fill(self.background) {
            warn!("Failed to clear surface: {}", err);
        }
        if let Some((width, height)) = self.pending_resize.take() {
            if let Err(err) = self.apply_resize(width, height) {
                warn!("Deferred resize to {}x{} failed: {}", width, height, err);
            }
        }
        self.invalidate_all();
    }

    /// Sets the color for strokes begun or committed from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if self.is_drawing() {
            self.update_overlay_dirty();
        }
        self.needs_redraw = true;
    }

    /// Sets the base width; non-positive or non-finite values are ignored.
    pub fn set_base_width(&mut self, width: f64) -> bool {
        if !width.is_finite() || width <= 0.0 {
            warn!("Ignoring invalid base width {}", width);
            return false;
        }
        self.base_width = width;
        true
    }

    pub fn set_show_prediction(&mut self, show: bool) {
        if self.show_prediction == show {
            return;
        }
        self.show_prediction = show;
        if self.is_drawing() {
            self.update_overlay_dirty();
            self.needs_redraw = true;
        }
    }

    /// Copies the committed pixels out as straight RGBA8.
    ///
    /// The live stroke and predicted tail are never included.
    pub fn export_surface(&self) -> Result<RasterSnapshot, CanvasError> {
        self.surface.snapshot()
    }

    /// Installs `snapshot` as the base layer and resets the history.
    ///
    /// The imported pixels sit under every later stroke and are not removed
    /// by undo; only [`clear`](Self::clear) drops them. A snapshot whose size
    /// differs from the surface is painted at the origin without scaling.
    /// A snapshot that cannot be painted is rejected before anything changes.
    pub fn import_surface(&mut self, snapshot: RasterSnapshot) -> Result<(), CanvasError> {
        checked_dimensions(snapshot.width(), snapshot.height())?;
        if snapshot.width() != self.width() || snapshot.height() != self.height() {
            info!(
                "Importing {}x{} raster onto {}x{} surface without scaling",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
        }

        self.base_layer = Some(snapshot);
        self.history.clear();
        let result = self.rebuild();
        self.invalidate_all();
        result
    }

    /// Reallocates the surface at the new size and replays the history.
    ///
    /// While a stroke is active the resize is held back and applied right
    /// after the stroke commits.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        checked_dimensions(width, height)?;

        if self.is_drawing() {
            debug!("Deferring resize to {}x{} until pen-up", width, height);
            self.pending_resize = Some((width, height));
            return Ok(());
        }

        self.pending_resize = None;
        self.apply_resize(width, height)
    }

    pub(super) fn apply_resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width == self.width() && height == self.height() {
            return Ok(());
        }

        self.surface = RasterSurface::new(width, height)?;
        let result = self.rebuild();
        self.invalidate_all();
        debug!(
            "Surface resized to {}x{}, replayed {} strokes",
            width,
            height,
            self.history.len()
        );
        result
    }
}
