mod pixel_buffer;
#[cfg(feature = "sdl")]
mod window;

pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "sdl")]
pub use window::{Display, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
