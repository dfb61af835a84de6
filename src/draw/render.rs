//! Cairo-based rendering functions for strokes and overlays.

use super::color::Color;
use super::stroke::Stroke;
use crate::input::Sample;

/// Renders all strokes in order (first stroke = bottom layer).
pub fn render_strokes<'a>(ctx: &cairo::Context, strokes: impl IntoIterator<Item = &'a Stroke>) {
    for stroke in strokes {
        render_stroke(ctx, stroke);
    }
}

/// Renders a single committed stroke with its own stored style.
pub fn render_stroke(ctx: &cairo::Context, stroke: &Stroke) {
    let style = stroke.style();
    render_polyline(ctx, stroke.points(), style.color, style.width);
}

/// Render a polyline through points with round caps and joins.
///
/// A single vertex is drawn as a dot. Accepts a borrowed slice so the
/// in-progress stroke can be drawn every frame without cloning it.
pub fn render_polyline(ctx: &cairo::Context, points: &[(f64, f64)], color: Color, width: f64) {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };

    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(x0, y0);
    if rest.is_empty() {
        // degenerate segment so the round cap produces a dot
        ctx.line_to(x0, y0);
    }
    for &(x, y) in rest {
        ctx.line_to(x, y);
    }

    let _ = ctx.stroke();
}

/// Renders predicted samples as a translucent tail.
///
/// The tail starts at `head` (the newest real vertex) when given, so it reads
/// as a continuation of the in-progress stroke.
pub fn render_prediction(
    ctx: &cairo::Context,
    head: Option<(f64, f64)>,
    predicted: &[Sample],
    color: Color,
    width: f64,
) {
    if predicted.is_empty() {
        return;
    }

    let points: Vec<(f64, f64)> = head
        .into_iter()
        .chain(predicted.iter().map(Sample::point))
        .collect();
    render_polyline(ctx, &points, color, width);
}
