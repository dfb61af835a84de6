//! Pressure-sensitive stroke engine.
//!
//! Raw pointer events flow through an [`input::InputRouter`] into the
//! capability backend chosen for the device ([`backend`]), and the resulting
//! samples drive a [`draw::StrokeCompositor`] that keeps a persistent raster
//! plus the stroke history needed to rebuild it on undo.

pub mod backend;
pub mod config;
pub mod draw;
pub mod input;
pub mod util;

pub use config::Config;
