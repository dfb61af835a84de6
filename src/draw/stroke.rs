//! Committed strokes and the pressure-to-width policy.

use super::color::Color;
use crate::util::Rect;

/// Multiplier applied to the base width at zero pressure.
pub const MIN_WIDTH_FACTOR: f64 = 0.5;

/// Additional width per unit of pressure, as a multiple of the base width.
pub const PRESSURE_WIDTH_GAIN: f64 = 1.5;

// Bounds beyond this are pinned so the integer rect math cannot overflow.
const COORD_LIMIT: f64 = (i32::MAX / 2) as f64;

/// Render style snapshotted when a stroke is committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Ink color
    pub color: Color,
    /// Line width in pixels at commit time
    pub width: f64,
}

/// A committed polyline plus its render style.
///
/// Strokes are created only at pen-up and never change afterwards; the
/// history can only drop them.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<(f64, f64)>,
    style: StrokeStyle,
}

impl Stroke {
    pub fn new(points: Vec<(f64, f64)>, style: StrokeStyle) -> Self {
        Self { points, style }
    }

    /// Polyline vertices in draw order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns the axis-aligned bounding box, expanded to cover the line width.
    ///
    /// Returns `None` only when the stroke has no vertices.
    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_points(&self.points, self.style.width)
    }
}

/// Render width for a sample: `base * (0.5 + pressure * 1.5)`.
///
/// Pressure is clamped to `[0, max_pressure]` so a noisy sensor cannot produce
/// runaway widths; a non-finite reading counts as the neutral 0.5.
pub fn pressure_width(base_width: f64, pressure: f32, max_pressure: f32) -> f64 {
    let pressure = if pressure.is_finite() {
        pressure.clamp(0.0, max_pressure.max(0.0))
    } else {
        crate::input::NEUTRAL_PRESSURE
    };
    base_width * (MIN_WIDTH_FACTOR + pressure as f64 * PRESSURE_WIDTH_GAIN)
}

fn stroke_padding(width: f64) -> f64 {
    // one extra pixel for antialiasing fringe
    (width / 2.0).ceil().max(1.0) + 1.0
}

pub(crate) fn bounding_box_for_points(points: &[(f64, f64)], width: f64) -> Option<Rect> {
    let (&(x0, y0), rest) = points.split_first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (x0, x0, y0, y0);

    for &(x, y) in rest {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let padding = stroke_padding(width);
    ensure_positive_rect(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

fn ensure_positive_rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Rect> {
    let pin = |v: f64| v.clamp(-COORD_LIMIT, COORD_LIMIT) as i32;
    let min_x = pin(min_x.floor());
    let min_y = pin(min_y.floor());
    let max_x = pin(max_x.ceil());
    let max_y = pin(max_y.ceil());
    let max_x = if min_x == max_x { max_x.saturating_add(1) } else { max_x };
    let max_y = if min_y == max_y { max_y.saturating_add(1) } else { max_y };
    Rect::from_min_max(min_x, min_y, max_x, max_y)
}
