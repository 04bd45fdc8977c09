//! CPU surface for ink - 8-bit RGBA storage

use crate::types::Rgb;

/// An 8-bit RGBA canvas.
///
/// Treated as opaque paper: blending touches RGB only and alpha stays at 255.
pub struct InkSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a]
    pixels: Vec<[u8; 4]>,
}

impl InkSurface {
    /// Create a new surface filled with `paper`
    pub fn new(width: u32, height: u32, paper: Rgb) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[paper.r, paper.g, paper.b, 255]; pixel_count],
        }
    }

    /// Clear the surface to a solid paper color
    pub fn clear(&mut self, paper: Rgb) {
        self.pixels.fill([paper.r, paper.g, paper.b, 255]);
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x as i64, y as i64).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(i) = self.index(x as i64, y as i64) {
            self.pixels[i] = color;
        }
    }

    /// Blend ink onto a pixel: `out = ink * alpha + dst * (1 - alpha)`.
    ///
    /// Signed coordinates so stamps hanging off the edge are clipped here
    /// instead of wrapping into the neighbouring row.
    #[inline]
    pub fn blend_rgb(&mut self, x: i64, y: i64, ink: Rgb, alpha: f64) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        let inv_alpha = 1.0 - alpha;
        let dst = &mut self.pixels[i];
        for (channel, pen) in dst.iter_mut().zip(ink.channels()) {
            let mixed = pen * alpha + *channel as f64 * inv_alpha;
            *channel = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Raw pixel data as bytes (RGBA8, row-major)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

impl std::fmt::Debug for InkSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InkSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
