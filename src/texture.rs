//! Textures: owned RGBA pixel buffers with optional spritesheet framing
//!
//! A texture owns its pixels exclusively and is not `Clone`. Moving it hands
//! the buffer over; `std::mem::take` leaves an empty, frameless texture behind.

use crate::blit::{self, BlitTarget, BlendMode, BYTES_PER_PIXEL};
use crate::error::{BlitError, LoadError};
use crate::geometry::{Point, Rect};
use log::{debug, info};
use std::path::Path;

/// An RGBA texture, 4 bytes per pixel, row-major with no padding
#[derive(Debug)]
pub struct Texture {
    pixels: Vec<u8>,
    texture_space: Rect,
    /// Columns and rows of the frame grid, (0, 0) when not a spritesheet
    frame_dimensions: Point,
    frames: u64,
}

impl Default for Texture {
    /// Empty texture: no pixels, no frames, degenerate bounds
    fn default() -> Self {
        Self {
            pixels: Vec::new(),
            texture_space: Rect::with_size(0, 0),
            frame_dimensions: Point::ZERO,
            frames: 0,
        }
    }
}

impl Texture {
    /// Blank, fully transparent texture
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            texture_space: Rect::with_size(width, height),
            frame_dimensions: Point::ZERO,
            frames: 0,
        }
    }

    /// Adopt an already decoded RGBA buffer
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, LoadError> {
        let expected = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(LoadError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            pixels: data,
            texture_space: Rect::with_size(width, height),
            frame_dimensions: Point::ZERO,
            frames: 0,
        })
    }

    /// Decode an image file into a texture. Any format the `image` crate was
    /// built with is accepted; everything is converted to RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        let texture = Self::from_rgba(width, height, decoded.into_raw())?;
        info!("loaded texture {} ({}x{})", path.display(), width, height);
        Ok(texture)
    }

    /// Load and immediately set up the frame grid
    pub fn load_with_frames(
        path: impl AsRef<Path>,
        frame_dimensions: Point,
    ) -> Result<Self, LoadError> {
        let mut texture = Self::load(path)?;
        texture.set_frame_dimensions(frame_dimensions);
        Ok(texture)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.texture_space.width().max(0) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.texture_space.height().max(0) as u32
    }

    #[inline]
    pub fn texture_space(&self) -> Rect {
        self.texture_space
    }

    #[inline]
    pub fn frame_dimensions(&self) -> Point {
        self.frame_dimensions
    }

    /// Number of frames in the grid; 0 means "not a spritesheet"
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn is_spritesheet(&self) -> bool {
        self.frames != 0
    }

    /// Pixel size of one frame, or the whole texture if there is no grid.
    ///
    /// Uses truncating division, so a grid that does not divide the texture
    /// evenly drops the trailing pixels on the right and bottom.
    pub fn frame_size(&self) -> Point {
        let size = Point::new(self.width() as i32, self.height() as i32);
        if self.is_spritesheet() {
            Point::new(
                size.x / self.frame_dimensions.x,
                size.y / self.frame_dimensions.y,
            )
        } else {
            size
        }
    }

    /// Turn the texture into a `cols` x `rows` spritesheet.
    ///
    /// A zero (or negative) axis disables spritesheet mode. Divisibility of the
    /// texture size is not checked here.
    pub fn set_frame_dimensions(&mut self, dimensions: Point) -> &mut Self {
        if dimensions.x <= 0 || dimensions.y <= 0 {
            return self.reset_frame_dimensions();
        }

        self.frames = u64::from(dimensions.x.unsigned_abs()) * u64::from(dimensions.y.unsigned_abs());
        self.frame_dimensions = dimensions;
        debug!(
            "texture {}x{} split into {} frames",
            self.width(),
            self.height(),
            dimensions
        );
        self
    }

    /// Disable spritesheet mode
    pub fn reset_frame_dimensions(&mut self) -> &mut Self {
        self.frames = 0;
        self.frame_dimensions = Point::ZERO;
        self
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width() && y < self.height())
            .then(|| blit::offset_of(x as usize, y as usize, self.width() as usize * BYTES_PER_PIXEL))
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.pixel_index(x, y)?;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(idx) = self.pixel_index(x, y) {
            self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    /// Blit onto a raw RGBA buffer covering `target_space`. See [`blit::blit`].
    pub fn blit(
        &self,
        target: &mut [u8],
        target_space: &Rect,
        point: Point,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), BlitError> {
        blit::blit(target, target_space, point, self, blend, frame)
    }

    /// Blit onto another texture or the screen back-buffer
    pub fn blit_onto<T: BlitTarget + ?Sized>(
        &self,
        target: &mut T,
        point: Point,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), BlitError> {
        let space = target.target_space();
        blit::blit(target.target_bytes_mut(), &space, point, self, blend, frame)
    }
}

// ============================================================================
// Procedural Texture Generators
// ============================================================================

impl Texture {
    /// Opaque checkerboard, handy as a background
    pub fn checkerboard(size: u32, tile_size: u32, c1: (u8, u8, u8), c2: (u8, u8, u8)) -> Self {
        let tile_size = tile_size.max(1);
        let mut tex = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / tile_size) + (y / tile_size)) % 2 == 0;
                let (r, g, b) = if checker { c1 } else { c2 };
                tex.set_pixel(x, y, [r, g, b, 255]);
            }
        }
        tex
    }

    /// Disc of `colour` whose alpha falls off quadratically towards the rim.
    /// The corners are fully transparent.
    pub fn glow(radius: u32, colour: (u8, u8, u8)) -> Self {
        let size = radius * 2;
        let mut tex = Self::new(size, size);
        let r = radius as f32;

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                let falloff = (1.0 - (dx * dx + dy * dy).sqrt() / r).max(0.0);
                let alpha = (falloff * falloff * 255.0).round() as u8;
                tex.set_pixel(x, y, [colour.0, colour.1, colour.2, alpha]);
            }
        }
        tex
    }

    /// Opaque spritesheet of `cols` x `rows` solid frames, each a different hue
    pub fn frame_strip(frame_width: u32, frame_height: u32, cols: u32, rows: u32) -> Self {
        let mut tex = Self::new(frame_width * cols, frame_height * rows);
        let count = (cols * rows).max(1);

        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                let hue = index as f32 * 360.0 / count as f32;
                let (r, g, b) = hue_to_rgb(hue);

                for y in 0..frame_height {
                    for x in 0..frame_width {
                        tex.set_pixel(col * frame_width + x, row * frame_height + y, [r, g, b, 255]);
                    }
                }
            }
        }

        tex.set_frame_dimensions(Point::new(cols as i32, rows as i32));
        tex
    }
}

/// Fully saturated hue (0-360) to RGB
fn hue_to_rgb(hue: f32) -> (u8, u8, u8) {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();

    let (r, g, b) = match h as i32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };

    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Texture::from_rgba(2, 2, vec![0; 16]).is_ok());

        let err = Texture::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::SizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_new_texture_space() {
        let tex = Texture::new(64, 32);
        assert_eq!(tex.texture_space(), Rect::new(0, 0, 63, 31));
        assert_eq!(tex.width(), 64);
        assert_eq!(tex.height(), 32);
        assert_eq!(tex.as_bytes().len(), 64 * 32 * 4);
        assert!(!tex.is_spritesheet());
        assert_eq!(tex.frame_size(), Point::new(64, 32));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Texture::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().contains("definitely/not/here.png"));
    }

    #[test]
    fn test_load_round_trips_png() {
        let path = std::env::temp_dir().join(format!("softblit-load-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 40]));
        img.save(&path).unwrap();

        let tex = Texture::load_with_frames(&path, Point::new(3, 1)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(tex.width(), 3);
        assert_eq!(tex.height(), 2);
        assert_eq!(tex.get_pixel(2, 1), Some([10, 20, 30, 40]));
        assert_eq!(tex.frame_count(), 3);
        assert_eq!(tex.frame_size(), Point::new(1, 2));
    }

    #[test]
    fn test_set_frame_dimensions() {
        let mut tex = Texture::new(100, 60);
        tex.set_frame_dimensions(Point::new(5, 3));
        assert_eq!(tex.frame_count(), 15);
        assert_eq!(tex.frame_dimensions(), Point::new(5, 3));
        assert_eq!(tex.frame_size(), Point::new(20, 20));

        tex.set_frame_dimensions(Point::new(4, 0));
        assert_eq!(tex.frame_count(), 0);
        assert_eq!(tex.frame_dimensions(), Point::ZERO);

        tex.set_frame_dimensions(Point::new(2, 2))
            .reset_frame_dimensions();
        assert!(!tex.is_spritesheet());
        assert_eq!(tex.frame_size(), Point::new(100, 60));
    }

    #[test]
    fn test_huge_frame_grid_counts_without_overflow() {
        let mut tex = Texture::new(4, 4);
        tex.set_frame_dimensions(Point::new(70_000, 70_000));
        assert_eq!(tex.frame_count(), 4_900_000_000);
        assert_eq!(tex.frame_size(), Point::ZERO);

        let mut target = vec![0u8; 4 * 4 * 4];
        tex.blit(&mut target, &Rect::with_size(4, 4), Point::ZERO, BlendMode::Opaque, Point::ZERO)
            .unwrap();
        assert!(target.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_frame_size_truncates() {
        let mut tex = Texture::new(10, 7);
        tex.set_frame_dimensions(Point::new(3, 2));
        assert_eq!(tex.frame_size(), Point::new(3, 3));
    }

    #[test]
    fn test_take_leaves_empty_texture() {
        let mut tex = Texture::frame_strip(4, 4, 2, 2);
        let moved = std::mem::take(&mut tex);

        assert_eq!(moved.frame_count(), 4);
        assert_eq!(moved.as_bytes().len(), 8 * 8 * 4);

        assert_eq!(tex.frame_count(), 0);
        assert!(tex.as_bytes().is_empty());
        assert!(tex.texture_space().is_empty());
        assert_eq!(tex.width(), 0);
    }

    #[test]
    fn test_pixel_access_bounds() {
        let mut tex = Texture::new(2, 2);
        tex.set_pixel(1, 1, [1, 2, 3, 4]);
        tex.set_pixel(2, 0, [9, 9, 9, 9]);
        assert_eq!(tex.get_pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(tex.get_pixel(2, 0), None);
        assert_eq!(tex.as_bytes().iter().filter(|&&b| b == 9).count(), 0);
    }

    #[test]
    fn test_glow_alpha_falloff() {
        let tex = Texture::glow(8, (255, 200, 100));
        assert_eq!(tex.width(), 16);
        let centre = tex.get_pixel(8, 8).unwrap();
        let corner = tex.get_pixel(0, 0).unwrap();
        assert_eq!(&centre[..3], &[255, 200, 100]);
        assert!(centre[3] > 200);
        assert_eq!(corner[3], 0);
    }

    #[test]
    fn test_frame_strip_frames_differ() {
        let tex = Texture::frame_strip(4, 4, 3, 1);
        assert_eq!(tex.frame_dimensions(), Point::new(3, 1));
        let a = tex.get_pixel(0, 0).unwrap();
        let b = tex.get_pixel(4, 0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a[3], 255);
        assert_eq!(tex.get_pixel(3, 3), Some(a));
    }
}
