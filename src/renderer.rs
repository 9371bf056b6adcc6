//! Renderer-facing API
//!
//! Game code talks to a [`Renderer2D`] in terms of texture handles; the
//! implementation owns the textures and the screen back-buffer and forwards
//! every draw to the compositing engine.

use crate::blit::BlendMode;
use crate::display::PixelBuffer;
use crate::error::RenderError;
use crate::geometry::Point;
use crate::texture::Texture;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Opaque texture handle minted by a renderer
pub type TextureId = usize;

/// Platform-independent 2D drawing
pub trait Renderer2D {
    /// Allocate the screen back-buffer. Calling it again resizes and clears.
    fn initialise(&mut self, screen_width: u32, screen_height: u32);

    /// Drop every loaded texture, invalidating all handles
    fn clear_texture_data(&mut self);

    /// Load a texture from disk. `frame_dimensions` of (0, 0) loads a plain
    /// texture, anything else a spritesheet of that many columns and rows.
    fn load_texture(
        &mut self,
        path: &Path,
        frame_dimensions: Point,
    ) -> Result<TextureId, RenderError>;

    /// Clear every byte of the screen to a level between 0 and 1.
    /// Quicker than [`Renderer2D::clear_to_colour`].
    fn clear_to_black(&mut self, level: f32) -> Result<(), RenderError>;

    /// Clear the screen to a colour, channels between 0 and 1
    fn clear_to_colour(&mut self, red: f32, green: f32, blue: f32, alpha: f32)
        -> Result<(), RenderError>;

    /// Draw a texture with its top-left corner at `point`
    fn draw_to_screen(
        &mut self,
        point: Point,
        id: TextureId,
        blend: BlendMode,
    ) -> Result<(), RenderError> {
        self.draw_frame_to_screen(point, id, blend, Point::ZERO)
    }

    /// Draw one frame of a spritesheet. Without a frame grid the whole
    /// texture is drawn and `frame` is ignored.
    fn draw_frame_to_screen(
        &mut self,
        point: Point,
        id: TextureId,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), RenderError>;

    /// Permanently draw `source` onto `target`
    fn draw_to_texture(
        &mut self,
        point: Point,
        source: TextureId,
        target: TextureId,
        blend: BlendMode,
    ) -> Result<(), RenderError> {
        self.draw_frame_to_texture(point, source, target, blend, Point::ZERO)
    }

    fn draw_frame_to_texture(
        &mut self,
        point: Point,
        source: TextureId,
        target: TextureId,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), RenderError>;
}

/// Map a 0..1 level to a byte
#[inline]
fn level_to_byte(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// CPU renderer drawing into a [`PixelBuffer`]
#[derive(Default)]
pub struct SoftwareRenderer {
    screen: Option<PixelBuffer>,
    textures: HashMap<TextureId, Texture>,
    next_id: TextureId,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and initialise in one go
    pub fn with_size(screen_width: u32, screen_height: u32) -> Self {
        let mut renderer = Self::new();
        renderer.initialise(screen_width, screen_height);
        renderer
    }

    /// Take ownership of an already built texture and hand out a handle.
    /// Handles are never reused, even after [`Renderer2D::clear_texture_data`].
    pub fn register_texture(&mut self, texture: Texture) -> TextureId {
        let id = self.next_id;
        self.next_id += 1;
        debug!(
            "registered texture {} ({}x{}, {} frames)",
            id,
            texture.width(),
            texture.height(),
            texture.frame_count()
        );
        self.textures.insert(id, texture);
        id
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Mutable access, e.g. to change the frame grid after loading
    pub fn texture_mut(&mut self, id: TextureId) -> Option<&mut Texture> {
        self.textures.get_mut(&id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// The back-buffer, once initialised
    pub fn screen(&self) -> Option<&PixelBuffer> {
        self.screen.as_ref()
    }

    fn screen_mut(&mut self) -> Result<&mut PixelBuffer, RenderError> {
        self.screen.as_mut().ok_or(RenderError::NotInitialised)
    }
}

impl Renderer2D for SoftwareRenderer {
    fn initialise(&mut self, screen_width: u32, screen_height: u32) {
        info!("software renderer initialised at {}x{}", screen_width, screen_height);
        self.screen = Some(PixelBuffer::with_size(screen_width, screen_height));
    }

    fn clear_texture_data(&mut self) {
        debug!("dropping {} textures", self.textures.len());
        self.textures.clear();
    }

    fn load_texture(
        &mut self,
        path: &Path,
        frame_dimensions: Point,
    ) -> Result<TextureId, RenderError> {
        let texture = Texture::load_with_frames(path, frame_dimensions)?;
        Ok(self.register_texture(texture))
    }

    fn clear_to_black(&mut self, level: f32) -> Result<(), RenderError> {
        let level = level_to_byte(level);
        self.screen_mut()?.fill(level);
        Ok(())
    }

    fn clear_to_colour(
        &mut self,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.screen_mut()?.clear(
            level_to_byte(red),
            level_to_byte(green),
            level_to_byte(blue),
            level_to_byte(alpha),
        );
        Ok(())
    }

    fn draw_frame_to_screen(
        &mut self,
        point: Point,
        id: TextureId,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), RenderError> {
        let screen = self.screen.as_mut().ok_or(RenderError::NotInitialised)?;
        let texture = self
            .textures
            .get(&id)
            .ok_or(RenderError::UnknownTexture(id))?;
        texture.blit_onto(screen, point, blend, frame)?;
        Ok(())
    }

    fn draw_frame_to_texture(
        &mut self,
        point: Point,
        source: TextureId,
        target: TextureId,
        blend: BlendMode,
        frame: Point,
    ) -> Result<(), RenderError> {
        if source == target {
            return Err(RenderError::SelfTarget(source));
        }
        if !self.textures.contains_key(&source) {
            return Err(RenderError::UnknownTexture(source));
        }

        // Lift the target out so the source can stay borrowed from the map.
        let mut canvas = self
            .textures
            .remove(&target)
            .ok_or(RenderError::UnknownTexture(target))?;

        let result = match self.textures.get(&source) {
            Some(texture) => texture
                .blit_onto(&mut canvas, point, blend, frame)
                .map_err(RenderError::from),
            None => Err(RenderError::UnknownTexture(source)),
        };

        self.textures.insert(target, canvas);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlitError;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Texture {
        Texture::from_rgba(width, height, rgba.repeat((width * height) as usize)).unwrap()
    }

    #[test]
    fn test_screen_ops_need_initialise() {
        let mut renderer = SoftwareRenderer::new();
        let id = renderer.register_texture(solid(2, 2, [1, 1, 1, 255]));

        assert!(matches!(
            renderer.clear_to_black(0.0),
            Err(RenderError::NotInitialised)
        ));
        assert!(matches!(
            renderer.draw_to_screen(Point::ZERO, id, BlendMode::Opaque),
            Err(RenderError::NotInitialised)
        ));
        assert!(renderer.screen().is_none());
    }

    #[test]
    fn test_clear_to_black_level() {
        let mut renderer = SoftwareRenderer::with_size(4, 4);
        renderer.clear_to_black(0.5).unwrap();
        let screen = renderer.screen().unwrap();
        assert!(screen.as_bytes().iter().all(|&b| b == 128));

        renderer.clear_to_black(-3.0).unwrap();
        assert!(renderer.screen().unwrap().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_to_colour() {
        let mut renderer = SoftwareRenderer::with_size(2, 1);
        renderer.clear_to_colour(1.0, 0.0, 0.2, 1.0).unwrap();
        assert_eq!(
            renderer.screen().unwrap().as_bytes(),
            &[255, 0, 51, 255, 255, 0, 51, 255]
        );
    }

    #[test]
    fn test_draw_to_screen_clips() {
        let mut renderer = SoftwareRenderer::with_size(4, 4);
        let id = renderer.register_texture(solid(3, 3, [10, 20, 30, 255]));

        renderer
            .draw_to_screen(Point::new(2, 2), id, BlendMode::Opaque)
            .unwrap();

        let screen = renderer.screen().unwrap();
        assert_eq!(screen.get_pixel(3, 3), Some([10, 20, 30, 255]));
        assert_eq!(screen.get_pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_frame_to_screen() {
        let mut renderer = SoftwareRenderer::with_size(4, 4);
        let sheet = Texture::frame_strip(4, 4, 2, 1);
        let second = sheet.get_pixel(4, 0).unwrap();
        let id = renderer.register_texture(sheet);

        renderer
            .draw_frame_to_screen(Point::ZERO, id, BlendMode::Opaque, Point::new(1, 0))
            .unwrap();
        assert_eq!(renderer.screen().unwrap().get_pixel(3, 3), Some(second));

        let err = renderer
            .draw_frame_to_screen(Point::ZERO, id, BlendMode::Opaque, Point::new(2, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Blit(BlitError::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_clear_texture_data_invalidates_handles() {
        let mut renderer = SoftwareRenderer::with_size(2, 2);
        let old = renderer.register_texture(solid(1, 1, [1, 1, 1, 255]));
        renderer.clear_texture_data();
        assert_eq!(renderer.texture_count(), 0);

        let new = renderer.register_texture(solid(1, 1, [2, 2, 2, 255]));
        assert_ne!(old, new);
        assert!(matches!(
            renderer.draw_to_screen(Point::ZERO, old, BlendMode::Opaque),
            Err(RenderError::UnknownTexture(id)) if id == old
        ));
    }

    #[test]
    fn test_draw_to_texture() {
        let mut renderer = SoftwareRenderer::new();
        let source = renderer.register_texture(solid(2, 2, [255, 255, 255, 128]));
        let target = renderer.register_texture(solid(4, 4, [0, 0, 0, 255]));

        renderer
            .draw_to_texture(Point::new(1, 1), source, target, BlendMode::Transparent)
            .unwrap();

        let canvas = renderer.texture(target).unwrap();
        assert_eq!(canvas.get_pixel(1, 1), Some([127, 127, 127, 255]));
        assert_eq!(canvas.get_pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(renderer.texture_count(), 2);
    }

    #[test]
    fn test_draw_to_texture_errors_keep_target() {
        let mut renderer = SoftwareRenderer::new();
        let sheet = renderer.register_texture(Texture::frame_strip(2, 2, 2, 2));
        let target = renderer.register_texture(Texture::new(4, 4));

        assert!(matches!(
            renderer.draw_to_texture(Point::ZERO, target, target, BlendMode::Opaque),
            Err(RenderError::SelfTarget(_))
        ));
        assert!(matches!(
            renderer.draw_to_texture(Point::ZERO, 99, target, BlendMode::Opaque),
            Err(RenderError::UnknownTexture(99))
        ));
        assert!(matches!(
            renderer.draw_frame_to_texture(
                Point::ZERO,
                sheet,
                target,
                BlendMode::Opaque,
                Point::new(0, 9)
            ),
            Err(RenderError::Blit(BlitError::InvalidFrame { .. }))
        ));

        let canvas = renderer.texture(target).unwrap();
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_texture_failure_registers_nothing() {
        let mut renderer = SoftwareRenderer::with_size(2, 2);
        let err = renderer
            .load_texture(Path::new("missing/explosion.png"), Point::new(5, 5))
            .unwrap_err();
        assert!(matches!(err, RenderError::Load(_)));
        assert_eq!(renderer.texture_count(), 0);
    }

    #[test]
    fn test_frame_grid_changes_through_handle() {
        let mut renderer = SoftwareRenderer::with_size(8, 8);
        let id = renderer.register_texture(Texture::frame_strip(2, 2, 4, 1));

        renderer.texture_mut(id).unwrap().reset_frame_dimensions();
        renderer.draw_to_screen(Point::ZERO, id, BlendMode::Opaque).unwrap();

        let screen = renderer.screen().unwrap();
        let last_frame = renderer.texture(id).unwrap().get_pixel(6, 0);
        assert_eq!(screen.get_pixel(6, 0), last_frame);
    }
}
