//! Scene configuration for the demo binary
//!
//! A scene is a list of sprites, each pointing at a texture source (an image
//! file or one of the procedural generators) plus where and how to draw it.

use crate::blit::BlendMode;
use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{ConfigError, LoadError};
use crate::geometry::Point;
use crate::texture::Texture;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a sprite's pixels come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    File {
        path: PathBuf,
        /// Columns and rows; (0, 0) for a plain texture
        #[serde(default)]
        frames: Point,
    },
    Checkerboard {
        size: u32,
        tile: u32,
        #[serde(default = "default_light")]
        light: (u8, u8, u8),
        #[serde(default = "default_dark")]
        dark: (u8, u8, u8),
    },
    Glow {
        radius: u32,
        #[serde(default = "default_glow")]
        colour: (u8, u8, u8),
    },
    FrameStrip {
        frame_width: u32,
        frame_height: u32,
        cols: u32,
        rows: u32,
    },
}

fn default_light() -> (u8, u8, u8) {
    (90, 90, 110)
}

fn default_dark() -> (u8, u8, u8) {
    (40, 40, 55)
}

fn default_glow() -> (u8, u8, u8) {
    (255, 220, 140)
}

impl TextureSource {
    /// Build the texture, decoding from disk for `File` sources
    pub fn build(&self) -> Result<Texture, LoadError> {
        match self {
            Self::File { path, frames } => Texture::load_with_frames(path, *frames),
            Self::Checkerboard {
                size,
                tile,
                light,
                dark,
            } => Ok(Texture::checkerboard(*size, *tile, *light, *dark)),
            Self::Glow { radius, colour } => Ok(Texture::glow(*radius, *colour)),
            Self::FrameStrip {
                frame_width,
                frame_height,
                cols,
                rows,
            } => Ok(Texture::frame_strip(*frame_width, *frame_height, *cols, *rows)),
        }
    }
}

/// One drawable instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub texture: TextureSource,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub blend: BlendMode,
    /// Starting frame for spritesheets
    #[serde(default)]
    pub frame: Point,
    /// Frames per second to step through the grid; 0 holds `frame`
    #[serde(default)]
    pub frame_rate: f32,
    /// Extra copies scattered at random positions across the screen
    #[serde(default)]
    pub scatter: u32,
}

/// Demo scene: screen setup plus sprites drawn back to front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
    /// Level passed to `clear_to_black` every frame
    #[serde(default)]
    pub black_level: f32,
    #[serde(default)]
    pub sprites: Vec<SpriteConfig>,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_vsync() -> bool {
    true
}

impl SceneConfig {
    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for SceneConfig {
    /// Built-in scene that needs no asset files: a tiled background, a glow in
    /// the centre and a handful of animated spritesheets.
    fn default() -> Self {
        let background = SpriteConfig {
            texture: TextureSource::Checkerboard {
                size: DEFAULT_WIDTH.max(DEFAULT_HEIGHT),
                tile: 32,
                light: default_light(),
                dark: default_dark(),
            },
            position: Point::ZERO,
            blend: BlendMode::Opaque,
            frame: Point::ZERO,
            frame_rate: 0.0,
            scatter: 0,
        };

        let glow = SpriteConfig {
            texture: TextureSource::Glow {
                radius: 32,
                colour: default_glow(),
            },
            position: Point::new(DEFAULT_WIDTH as i32 / 2 - 32, DEFAULT_HEIGHT as i32 / 2 - 32),
            blend: BlendMode::Transparent,
            frame: Point::ZERO,
            frame_rate: 0.0,
            scatter: 0,
        };

        let explosions = SpriteConfig {
            texture: TextureSource::FrameStrip {
                frame_width: 24,
                frame_height: 24,
                cols: 5,
                rows: 5,
            },
            position: Point::ZERO,
            blend: BlendMode::Transparent,
            frame: Point::ZERO,
            frame_rate: 12.0,
            scatter: 10,
        };

        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            black_level: 0.0,
            sprites: vec![background, glow, explosions],
        }
    }
}
