//! Dirty region tracking for incremental rendering.
//!
//! Collects axis-aligned rectangles that need repainting between frames.
//! Committing a stroke only dirties its bounds; undo, clear, import and resize
//! dirty the whole surface.

use super::Stroke;
use crate::util::Rect;

/// Tracks dirty rectangles accumulated between renders.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        self.regions.push(rect);
    }

    /// Adds a dirty rectangle when present.
    pub fn mark_optional_rect(&mut self, rect: Option<Rect>) {
        if let Some(rect) = rect {
            self.mark_rect(rect);
        }
    }

    /// Adds the bounding box for the given stroke, or full damage if none is available.
    pub fn mark_stroke(&mut self, stroke: &Stroke) {
        match stroke.bounding_box() {
            Some(rect) => self.mark_rect(rect),
            None => self.mark_full(),
        }
    }

    /// Whether anything is pending.
    pub fn is_dirty(&self) -> bool {
        self.force_full || !self.regions.is_empty()
    }

    /// Drains the dirty regions gathered so far, clipped to the surface.
    ///
    /// When the full surface is marked, returns a single rectangle covering the
    /// entire surface; otherwise returns accumulated rectangles.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            return Rect::new(0, 0, width, height).into_iter().collect();
        }
        self.regions
            .drain(..)
            .filter_map(|rect| rect.clamp_to_bounds(width, height))
            .collect()
    }
}
