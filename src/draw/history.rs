//! Ordered stroke history, the authoritative undo log.

use super::stroke::Stroke;

/// Committed strokes in draw order (first = bottom layer, last = top layer).
///
/// Append-only except for [`undo`](Self::undo) and [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
}

impl StrokeHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a freshly committed stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Removes and returns the most recently committed stroke, if any.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Drops every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }
}
