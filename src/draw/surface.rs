//! Persistent raster surface backed by a Cairo image surface.
//!
//! Pixels live in Cairo's native premultiplied ARGB32 layout. Everything that
//! crosses the crate boundary goes through [`RasterSnapshot`], a straight
//! (non-premultiplied) RGBA8 buffer.

use std::io::Write;

use thiserror::Error;

use super::color::Color;

/// Largest edge accepted for a surface (Cairo's own limit is 32767).
pub const MAX_SURFACE_EDGE: u32 = 16384;

/// Errors raised while creating, reading or writing raster surfaces.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("snapshot holds {actual} bytes, expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("failed to write PNG: {0}")]
    Png(#[from] cairo::IoError),
}

/// Opaque raster exchanged with persistence collaborators: width x height x RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSnapshot {
    /// Wraps a row-major RGBA8 buffer without padding.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CanvasError::SnapshotLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a snapshot filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let rgba = color.to_rgba8();
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    fn to_image_surface(&self) -> Result<cairo::ImageSurface, CanvasError> {
        let (width, height) = checked_dimensions(self.width, self.height)?;
        let stride = cairo::Format::ARgb32.stride_for_width(self.width)?;
        let row_bytes = self.width as usize * 4;

        let mut data = vec![0u8; stride as usize * self.height as usize];
        for (src, dst) in self
            .pixels
            .chunks_exact(row_bytes)
            .zip(data.chunks_exact_mut(stride as usize))
        {
            for (rgba, out) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
                let argb = premultiply([rgba[0], rgba[1], rgba[2], rgba[3]]);
                out.copy_from_slice(&argb.to_ne_bytes());
            }
        }

        Ok(cairo::ImageSurface::create_for_data(
            data,
            cairo::Format::ARgb32,
            width,
            height,
            stride,
        )?)
    }
}

/// Fixed-size pixel buffer matching the view dimensions.
#[derive(Debug)]
pub struct RasterSurface {
    surface: cairo::ImageSurface,
}

impl RasterSurface {
    /// Allocates a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let (w, h) = checked_dimensions(width, height)?;
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, w, h)?;
        Ok(Self { surface })
    }

    pub fn width(&self) -> u32 {
        self.surface.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.surface.height() as u32
    }

    /// Opens a drawing context on the surface. Drop it before reading pixels.
    pub fn context(&self) -> Result<cairo::Context, CanvasError> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    /// Replaces every pixel with `color`.
    pub fn fill(&self, color: Color) -> Result<(), CanvasError> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Source);
        color.apply(&ctx);
        ctx.paint()?;
        Ok(())
    }

    /// Composites `snapshot` over the surface at the origin, without scaling.
    pub fn paint_snapshot(&self, snapshot: &RasterSnapshot) -> Result<(), CanvasError> {
        let source = snapshot.to_image_surface()?;
        let ctx = self.context()?;
        ctx.set_source_surface(&source, 0.0, 0.0)?;
        ctx.paint()?;
        Ok(())
    }

    /// Paints this surface onto another context at the origin.
    pub fn paint_onto(&self, ctx: &cairo::Context) -> Result<(), CanvasError> {
        ctx.set_source_surface(&self.surface, 0.0, 0.0)?;
        ctx.paint()?;
        Ok(())
    }

    /// Reads the whole surface back as straight RGBA8.
    pub fn snapshot(&self) -> Result<RasterSnapshot, CanvasError> {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let stride = self.surface.stride() as usize;
        let mut pixels = Vec::with_capacity(width * height * 4);

        self.surface.with_data(|data| {
            for row in data.chunks_exact(stride).take(height) {
                for px in row[..width * 4].chunks_exact(4) {
                    let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    pixels.extend_from_slice(&unpremultiply(argb));
                }
            }
        })?;

        RasterSnapshot::new(self.width(), self.height(), pixels)
    }

    /// Encodes the surface as PNG.
    pub fn write_png<W: Write>(&self, stream: &mut W) -> Result<(), CanvasError> {
        self.surface.write_to_png(stream)?;
        Ok(())
    }
}

pub(crate) fn checked_dimensions(width: u32, height: u32) -> Result<(i32, i32), CanvasError> {
    if width == 0 || height == 0 || width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok((width as i32, height as i32))
}

fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    let scale = |c: u8| (c as u32 * a as u32 + 127) / 255;
    (a as u32) << 24 | scale(r) << 16 | scale(g) << 8 | scale(b)
}

fn unpremultiply(argb: u32) -> [u8; 4] {
    let a = argb >> 24;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |shift: u32| {
        let c = (argb >> shift) & 0xff;
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    [channel(16), channel(8), channel(0), a as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, WHITE};

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(CanvasError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(RasterSurface::new(10, MAX_SURFACE_EDGE + 1).is_err());
    }

    #[test]
    fn fill_reads_back_as_rgba() {
        let surface = RasterSurface::new(4, 3).unwrap();
        surface.fill(WHITE).unwrap();
        let snapshot = surface.snapshot().unwrap();
        assert_eq!(snapshot.width(), 4);
        assert_eq!(snapshot.height(), 3);
        assert!(snapshot.pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn opaque_snapshot_survives_paint_and_readback() {
        let mut pixels = Vec::new();
        for i in 0..6u8 {
            pixels.extend_from_slice(&[i * 40, 255 - i * 40, 7, 255]);
        }
        let snapshot = RasterSnapshot::new(3, 2, pixels).unwrap();

        let surface = RasterSurface::new(3, 2).unwrap();
        surface.fill(BLUE).unwrap();
        surface.paint_snapshot(&snapshot).unwrap();
        assert_eq!(surface.snapshot().unwrap(), snapshot);
    }

    #[test]
    fn translucent_snapshot_blends_over_existing_pixels() {
        let surface = RasterSurface::new(1, 1).unwrap();
        surface.fill(WHITE).unwrap();
        let overlay = RasterSnapshot::new(1, 1, vec![0, 0, 0, 128]).unwrap();
        surface.paint_snapshot(&overlay).unwrap();

        let px = surface.snapshot().unwrap().pixel(0, 0).unwrap();
        assert_eq!(px[3], 255);
        assert!((120..=135).contains(&px[0]), "blended red channel {}", px[0]);
    }

    #[test]
    fn snapshot_length_is_validated() {
        assert!(matches!(
            RasterSnapshot::new(2, 2, vec![0; 15]),
            Err(CanvasError::SnapshotLength {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn pixel_lookup_is_bounds_checked() {
        let snapshot = RasterSnapshot::filled(2, 2, BLUE);
        assert_eq!(snapshot.pixel(1, 1), Some([0, 0, 255, 255]));
        assert_eq!(snapshot.pixel(2, 0), None);
    }

    #[test]
    fn png_encoding_produces_signature() {
        let surface = RasterSurface::new(2, 2).unwrap();
        surface.fill(WHITE).unwrap();
        let mut out = Vec::new();
        surface.write_png(&mut out).unwrap();
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
    }
}
