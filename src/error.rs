//! Error types for texture loading, blitting and rendering

use crate::geometry::Point;
use crate::renderer::TextureId;
use std::path::PathBuf;
use thiserror::Error;

/// Texture construction failed; no texture is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to initialise texture with file \"{}\": {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel data is {actual} bytes, a {width}x{height} RGBA texture needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Blit contract violations. Raised before any byte of the target is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlitError {
    #[error("invalid target: {len} bytes cannot back a {width}x{height} surface")]
    InvalidTarget { len: usize, width: i32, height: i32 },

    #[error("invalid frame {frame} given, texture frame count is {frames}")]
    InvalidFrame { frame: Point, frames: Point },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer used before initialise()")]
    NotInitialised,

    #[error("no texture loaded with id {0}")]
    UnknownTexture(TextureId),

    #[error("texture {0} cannot be drawn onto itself")]
    SelfTarget(TextureId),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Blit(#[from] BlitError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
