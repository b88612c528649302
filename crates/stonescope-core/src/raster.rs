//! CPU raster buffers.
//!
//! A [`Raster`] is a plain RGBA8 pixel buffer. It is the currency between
//! the resolver/synthesizer and the material builder: decoded photographs
//! and synthesized granite both arrive as rasters, and the render layer
//! uploads them verbatim.

use crate::error::{CoreError, Result};

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a raster filled with a solid color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps an existing RGBA8 buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::RasterSizeMismatch`] if the buffer length does
    /// not equal `width * height * 4`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(CoreError::RasterSizeMismatch {
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

    /// Raster width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The raw RGBA8 bytes, row-major, top-left origin.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Approximate in-memory size in megabytes, for cache accounting.
    #[must_use]
    pub fn approx_size_mb(&self) -> f32 {
        self.pixels.len() as f32 / (1024.0 * 1024.0)
    }

    /// Reads the pixel at `(x, y)`. Out-of-bounds reads return opaque black.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 255];
        }
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Writes the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Alpha-blends `color` over the pixel at `(x, y)` with the given
    /// opacity in `[0, 1]`. The destination stays opaque.
    pub fn blend(&mut self, x: u32, y: u32, color: [u8; 3], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let a = opacity.clamp(0.0, 1.0);
        let dst = self.get(x, y);
        let mix = |d: u8, s: u8| -> u8 {
            let v = f32::from(d) * (1.0 - a) + f32::from(s) * a;
            // Round-half-up keeps the blend deterministic across platforms.
            (v + 0.5).floor().clamp(0.0, 255.0) as u8
        };
        self.put(
            x,
            y,
            [
                mix(dst[0], color[0]),
                mix(dst[1], color[1]),
                mix(dst[2], color[2]),
                255,
            ],
        );
    }

    /// Luminance of the pixel at `(x, y)` in `[0, 1]` (Rec. 601 weights).
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let [r, g, b, _] = self.get(x, y);
        (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_dimensions() {
        let r = Raster::filled(4, 3, [10, 20, 30, 255]);
        assert_eq!(r.dimensions(), (4, 3));
        assert_eq!(r.as_bytes().len(), 4 * 3 * 4);
        assert_eq!(r.get(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_from_pixels_size_check() {
        assert!(Raster::from_pixels(2, 2, vec![0; 16]).is_ok());
        let err = Raster::from_pixels(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, CoreError::RasterSizeMismatch { .. }));
    }

    #[test]
    fn test_put_get_roundtrip() {
        let mut r = Raster::filled(8, 8, [0, 0, 0, 255]);
        r.put(3, 5, [1, 2, 3, 255]);
        assert_eq!(r.get(3, 5), [1, 2, 3, 255]);
        // out of bounds is a no-op
        r.put(100, 100, [9, 9, 9, 255]);
        assert_eq!(r.get(100, 100), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blend_full_opacity_replaces() {
        let mut r = Raster::filled(2, 2, [0, 0, 0, 255]);
        r.blend(0, 0, [200, 100, 50], 1.0);
        assert_eq!(r.get(0, 0), [200, 100, 50, 255]);
    }

    #[test]
    fn test_blend_zero_opacity_keeps() {
        let mut r = Raster::filled(2, 2, [7, 8, 9, 255]);
        r.blend(0, 0, [200, 100, 50], 0.0);
        assert_eq!(r.get(0, 0), [7, 8, 9, 255]);
    }
}
