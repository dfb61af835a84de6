//! Stroke rendering and the persistent drawing surface (Cairo-based).
//!
//! This module defines the drawing types used by the stroke engine:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Stroke`]: A committed polyline with its color and width
//! - [`StrokeHistory`]: Ordered log of committed strokes, used for undo
//! - [`RasterSurface`] / [`RasterSnapshot`]: Persistent pixels and their export form
//! - [`StrokeCompositor`]: Pen-down/move/up state machine that owns all of the above

pub mod color;
pub mod compositor;
pub mod dirty;
pub mod history;
pub mod render;
pub mod stroke;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use compositor::{CompositorSettings, StrokeCompositor, StrokeState};
pub use dirty::DirtyTracker;
pub use history::StrokeHistory;
pub use render::{render_polyline, render_prediction, render_stroke, render_strokes};
pub use stroke::{Stroke, StrokeStyle, pressure_width};
pub use surface::{CanvasError, RasterSnapshot, RasterSurface};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
