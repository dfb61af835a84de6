mod actions;
mod core;
mod lifecycle;
#[cfg(test)]
mod tests;

pub use core::{
    CompositorSettings, DEFAULT_PREDICTION_ALPHA, DEFAULT_PREDICTION_WIDTH_FACTOR,
    StrokeCompositor, StrokeState,
};
