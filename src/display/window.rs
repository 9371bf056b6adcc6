//! SDL2 presentation of the software back-buffer
//!
//! The renderer never touches SDL; each frame the finished [`PixelBuffer`] is
//! uploaded to a streaming texture and stretched over the window.

use super::PixelBuffer;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

/// Streaming texture the back-buffer is uploaded into
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

impl Display {
    /// Open a centred window. With `vsync` off, presentation is uncapped.
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl = sdl2::init()?;
        let window = sdl
            .video()?
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let builder = window.into_canvas().accelerated();
        let canvas = if vsync { builder.present_vsync() } else { builder }
            .build()
            .map_err(|e| e.to_string())?;

        let creator = canvas.texture_creator();
        let event_pump = sdl.event_pump()?;
        Ok((Self { canvas, event_pump }, creator))
    }

    /// Upload `buffer` and flip. The buffer must match the target's size.
    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<(), String> {
        if (buffer.width(), buffer.height()) != (target.width, target.height) {
            return Err(format!(
                "back-buffer is {}x{} but the render target is {}x{}",
                buffer.width(),
                buffer.height(),
                target.width,
                target.height
            ));
        }

        target
            .texture
            .update(None, buffer.as_bytes(), buffer.stride())
            .map_err(|e| e.to_string())?;
        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Drain pending events; true once the window was closed or Escape hit
    pub fn quit_requested(&mut self) -> bool {
        self.event_pump.poll_iter().fold(false, |quit, event| {
            quit || matches!(
                event,
                Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    }
            )
        })
    }
}

impl<'a> RenderTarget<'a> {
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        // ABGR8888 is a packed format; on little-endian hosts its bytes are
        // laid out R, G, B, A, which is what PixelBuffer stores.
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}
