//! Software 2D compositing
//!
//! Textures own RGBA pixel buffers, can be split into spritesheet frames and
//! are blitted (opaque copy or alpha blend, clipped to the target) onto other
//! textures or a screen back-buffer. [`Renderer2D`] is the handle-based API
//! game code draws through.

pub mod blit;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod texture;
pub mod util;

pub use blit::{blit, BlendMode, BlitTarget};
pub use display::PixelBuffer;
pub use error::{BlitError, ConfigError, LoadError, RenderError};
pub use geometry::{Point, Rect};
pub use renderer::{Renderer2D, SoftwareRenderer, TextureId};
pub use texture::Texture;
