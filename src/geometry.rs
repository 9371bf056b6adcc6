//! Integer geometry for blitting
//!
//! Rectangles use inclusive bounds throughout: a 64x64 texture covers
//! `[0, 0]..=[63, 63]`. A rectangle whose width or height is zero or negative
//! is degenerate and means "nothing to draw".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D integer point, also used for frame coordinates and frame grid sizes
/// (`x` = columns, `y` = rows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Component-wise product, e.g. frame coordinate * frame size
impl Mul for Point {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[inline]
const fn clamp_size(size: u32) -> i32 {
    if size > i32::MAX as u32 {
        i32::MAX
    } else {
        size as i32
    }
}

/// Axis-aligned rectangle with inclusive bounds.
///
/// Nothing is normalised on construction; `left > right` is allowed and simply
/// yields a non-positive `width()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Rect {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering `[0, 0]..=[width - 1, height - 1]`.
    /// Sizes beyond `i32::MAX` are clamped.
    #[inline]
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, clamp_size(width) - 1, clamp_size(height) - 1)
    }

    /// Rectangle with its top-left corner at `origin`.
    ///
    /// The far edges saturate at `i32::MAX`; nothing past it is addressable.
    #[inline]
    pub const fn at(origin: Point, width: i32, height: i32) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(width - 1),
            origin.y.saturating_add(height - 1),
        )
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.left
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.top
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.right
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.bottom
    }

    #[inline]
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// True when there is nothing to draw
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn set_right(&mut self, right: i32) {
        self.right = right;
    }

    #[inline]
    pub fn set_bottom(&mut self, bottom: i32) {
        self.bottom = bottom;
    }

    /// Shift both corners by the same delta
    #[inline]
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Non-strict overlap test; rectangles sharing an edge pixel intersect.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    /// True if `other` lies entirely inside `self`
    #[inline]
    pub const fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    #[inline]
    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Shrink to the intersection with `other`.
    ///
    /// If the two did not intersect the result is degenerate (`is_empty()`),
    /// which every caller treats as "nothing to draw".
    #[inline]
    pub fn clip_to(&mut self, other: &Self) {
        self.left = self.left.max(other.left);
        self.top = self.top.max(other.top);
        self.right = self.right.min(other.right);
        self.bottom = self.bottom.min(other.bottom);
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]..[{}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}
