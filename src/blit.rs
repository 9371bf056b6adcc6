//! Compositing engine
//!
//! Works out which part of a texture (or one frame of a spritesheet) lands
//! inside the target rectangle, then copies or alpha-blends exactly that span.
//! Clipped-away pixels are never visited, so the inner loops carry no bounds
//! checks of their own.

use crate::display::PixelBuffer;
use crate::error::BlitError;
use crate::geometry::{Point, Rect};
use crate::texture::Texture;
use log::trace;
use serde::{Deserialize, Serialize};

/// R, G, B, A
pub const BYTES_PER_PIXEL: usize = 4;

const ALPHA_INDEX: usize = 3;

/// How a texture is combined with the pixels underneath it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Straight row copy, alpha ignored. Fastest.
    #[default]
    Opaque,
    /// Per-pixel source-over using the source alpha channel
    Transparent,
}

/// Anything a texture can be blitted onto
pub trait BlitTarget {
    /// Bounds of the surface; pixel `(left, top)` is the first byte quad
    fn target_space(&self) -> Rect;

    fn target_bytes_mut(&mut self) -> &mut [u8];
}

impl BlitTarget for Texture {
    fn target_space(&self) -> Rect {
        self.texture_space()
    }

    fn target_bytes_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl BlitTarget for PixelBuffer {
    fn target_space(&self) -> Rect {
        self.bounds()
    }

    fn target_bytes_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

/// Byte offset of pixel `(x, y)` in a buffer whose rows are `stride` bytes
#[inline]
pub const fn offset_of(x: usize, y: usize, stride: usize) -> usize {
    x * BYTES_PER_PIXEL + y * stride
}

/// Integer source-over for one channel: `dst + alpha * (src - dst) / 256`.
///
/// The shift stands in for a divide by 255. The result is biased slightly
/// towards `dst` and must stay that way to match reference output.
#[inline]
pub const fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let dst = dst as i32;
    (dst + ((alpha as i32 * (src as i32 - dst)) >> 8)) as u8
}

/// Result of clipping a draw against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPlan {
    /// Span to copy, relative to the draw point (frame-local texture space)
    pub area: Rect,
    /// Top-left of the selected frame inside the texture
    pub frame_offset: Point,
}

/// Validate `frame` and clip the draw of `source` at `point` to `target_space`.
///
/// `Ok(None)` means the draw misses the target entirely.
pub fn plan_draw(
    source: &Texture,
    target_space: &Rect,
    point: Point,
    frame: Point,
) -> Result<Option<DrawPlan>, BlitError> {
    let mut area = Rect::at(point, source.width() as i32, source.height() as i32);
    let mut frame_offset = Point::ZERO;

    if source.is_spritesheet() {
        let frames = source.frame_dimensions();
        if frame.x < 0 || frame.y < 0 || frame.x >= frames.x || frame.y >= frames.y {
            return Err(BlitError::InvalidFrame { frame, frames });
        }

        let frame_size = source.frame_size();
        area.set_right(point.x.saturating_add(frame_size.x - 1));
        area.set_bottom(point.y.saturating_add(frame_size.y - 1));
        frame_offset = frame * frame_size;
    }

    if area.is_empty() || !target_space.intersects(&area) {
        return Ok(None);
    }

    if !target_space.contains(&area) {
        area.clip_to(target_space);
    }

    area.translate(-point.x, -point.y);

    Ok(Some(DrawPlan { area, frame_offset }))
}

/// Draw `source` (or one of its frames) onto `target` at `point`.
///
/// `target` holds `target_space.width() * target_space.height()` RGBA pixels,
/// row-major, with `target_space`'s top-left corner at byte 0. Draws that fall
/// outside `target_space` are clipped; draws that miss it are silently skipped.
/// `frame` is ignored unless `source` is a spritesheet.
pub fn blit(
    target: &mut [u8],
    target_space: &Rect,
    point: Point,
    source: &Texture,
    blend: BlendMode,
    frame: Point,
) -> Result<(), BlitError> {
    validate_target(target, target_space)?;

    let Some(plan) = plan_draw(source, target_space, point, frame)? else {
        trace!("blit at {} misses target {}, skipped", point, target_space);
        return Ok(());
    };

    let span = Span::new(source, target_space, point, &plan);
    match blend {
        BlendMode::Opaque => blit_opaque(target, source.as_bytes(), &span),
        BlendMode::Transparent => blit_transparent(target, source.as_bytes(), &span),
    }

    Ok(())
}

fn validate_target(target: &[u8], target_space: &Rect) -> Result<(), BlitError> {
    let width = target_space.width();
    let height = target_space.height();

    let needed = if target_space.is_empty() {
        None
    } else {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
    };

    match needed {
        Some(needed) if !target.is_empty() && target.len() >= needed => Ok(()),
        _ => Err(BlitError::InvalidTarget {
            len: target.len(),
            width,
            height,
        }),
    }
}

/// Byte-level addressing for one planned draw
#[derive(Debug)]
struct Span {
    rows: usize,
    row_bytes: usize,
    src_start: usize,
    src_stride: usize,
    dst_start: usize,
    dst_stride: usize,
}

impl Span {
    fn new(source: &Texture, target_space: &Rect, point: Point, plan: &DrawPlan) -> Self {
        let area = plan.area;
        let src_stride = source.width() as usize * BYTES_PER_PIXEL;
        let dst_stride = target_space.width() as usize * BYTES_PER_PIXEL;
        let origin = target_space.top_left();

        // Both offsets are non-negative once the area has been clipped.
        let src_start = offset_of(
            (area.left() + plan.frame_offset.x) as usize,
            (area.top() + plan.frame_offset.y) as usize,
            src_stride,
        );
        let dst_start = offset_of(
            (point.x + area.left() - origin.x) as usize,
            (point.y + area.top() - origin.y) as usize,
            dst_stride,
        );

        Self {
            rows: area.height() as usize,
            row_bytes: area.width() as usize * BYTES_PER_PIXEL,
            src_start,
            src_stride,
            dst_start,
            dst_stride,
        }
    }

    /// Calls `f` with each matching (source row, target row) pair, both
    /// exactly `row_bytes` long.
    fn for_each_row(&self, source: &[u8], target: &mut [u8], mut f: impl FnMut(&[u8], &mut [u8])) {
        let rows = source[self.src_start..]
            .chunks(self.src_stride)
            .zip(target[self.dst_start..].chunks_mut(self.dst_stride))
            .take(self.rows);

        for (src, dst) in rows {
            f(&src[..self.row_bytes], &mut dst[..self.row_bytes]);
        }
    }
}

/// One slice copy per row; strides differ so the span is never one bulk copy.
fn blit_opaque(target: &mut [u8], source: &[u8], span: &Span) {
    span.for_each_row(source, target, |src, dst| dst.copy_from_slice(src));
}

fn blit_transparent(target: &mut [u8], source: &[u8], span: &Span) {
    span.for_each_row(source, target, |src_row, dst_row| {
        for (src, dst) in src_row
            .chunks_exact(BYTES_PER_PIXEL)
            .zip(dst_row.chunks_exact_mut(BYTES_PER_PIXEL))
        {
            blend_pixel(dst, src);
        }
    });
}

/// Destination alpha is left as it was.
#[inline]
fn blend_pixel(dst: &mut [u8], src: &[u8]) {
    match src[ALPHA_INDEX] {
        0 => {},
        255 => dst[..ALPHA_INDEX].copy_from_slice(&src[..ALPHA_INDEX]),
        alpha => {
            for (d, &s) in dst[..ALPHA_INDEX].iter_mut().zip(&src[..ALPHA_INDEX]) {
                *d = blend_channel(s, *d, alpha);
            }
        },
    }
}
