use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::blit::{offset_of, BYTES_PER_PIXEL};
use crate::geometry::{Point, Rect};

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA screen back-buffer for software rendering.
/// Byte order per pixel is R, G, B, A, the same as [`crate::Texture`].
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new black, fully transparent pixel buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Inclusive screen rectangle `[0, 0]..[width - 1, height - 1]`
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    #[inline]
    fn pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        self.bounds()
            .contains_point(Point::new(x, y))
            .then(|| offset_of(x as usize, y as usize, self.stride()))
    }

    /// Bytes per row
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Set every byte, alpha included, to `level`.
    /// A single fill, so cheaper than [`PixelBuffer::clear`]; 0 is black.
    pub fn fill(&mut self, level: u8) {
        self.pixels.fill(level);
    }

    /// Clear to a solid colour
    pub fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let pixel = [r, g, b, a];
        for chunk in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&pixel);
        }
    }

    /// Read a pixel as `[r, g, b, a]`, `None` when out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let idx = self.pixel_index(x, y)?;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Write a pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some(idx) = self.pixel_index(x, y) {
            self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let buf = PixelBuffer::default();
        assert_eq!(buf.width(), DEFAULT_WIDTH);
        assert_eq!(buf.height(), DEFAULT_HEIGHT);
        assert_eq!(buf.as_bytes().len(), (DEFAULT_WIDTH * DEFAULT_HEIGHT * 4) as usize);
    }

    #[test]
    fn test_bounds_inclusive() {
        let buf = PixelBuffer::with_size(320, 200);
        assert_eq!(buf.bounds(), Rect::new(0, 0, 319, 199));
        assert_eq!(buf.stride(), 1280);
    }

    #[test]
    fn test_fill_sets_every_byte() {
        let mut buf = PixelBuffer::with_size(3, 2);
        buf.fill(64);
        assert!(buf.as_bytes().iter().all(|&b| b == 64));
    }

    #[test]
    fn test_clear_rgba_order() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.clear(1, 2, 3, 4);
        assert_eq!(buf.as_bytes(), [1, 2, 3, 4].repeat(4).as_slice());
    }

    #[test]
    fn test_pixel_bounds() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.set_pixel(1, 0, [9, 8, 7, 6]);
        buf.set_pixel(-1, 0, [1, 1, 1, 1]);
        buf.set_pixel(0, 2, [1, 1, 1, 1]);
        assert_eq!(buf.get_pixel(1, 0), Some([9, 8, 7, 6]));
        assert_eq!(buf.get_pixel(2, 0), None);
        assert_eq!(buf.as_bytes().iter().filter(|&&b| b == 1).count(), 0);
    }
}
