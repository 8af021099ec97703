// src/surface.rs

//! Drawing targets.
//!
//! A `Surface` is the mutable target every operation draws on. Surfaces are
//! allocated once per `Loop` through a `SurfaceProvider` and are then owned
//! exclusively by the loop's worker thread, which is why `Surface: Send` but
//! never `Sync`-shared.

mod buffer;

pub use buffer::{BufferProvider, PixelBuffer};

use crate::color::Color;
use anyhow::Result;
use std::ops::{Add, AddAssign};

/// An integer pixel position. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

/// Dimensions of a surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A half-open pixel rectangle `[min, max)`. Always normalised so that
/// `min.x <= max.x` and `min.y <= max.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    min: Point,
    max: Point,
}

impl Rect {
    /// Builds a rectangle from any two opposite corners.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// A `width` x `height` rectangle centred on `center`. Odd extents are
    /// truncated symmetrically; edges past the `i32` range are clamped.
    pub fn centered(center: Point, width: i32, height: i32) -> Self {
        let (half_w, half_h) = (width / 2, height / 2);
        Self::new(
            center.x.saturating_sub(half_w),
            center.y.saturating_sub(half_h),
            center.x.saturating_add(half_w),
            center.y.saturating_add(half_h),
        )
    }

    /// The rectangle covering a whole surface of `size`.
    pub fn from_size(size: Size) -> Self {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        Self::new(0, 0, width, height)
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// The overlap of two rectangles; empty (at `min`) when they do not meet.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min = Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        if min.x >= max.x || min.y >= max.y {
            return Rect { min, max: min };
        }
        Rect { min, max }
    }
}

/// A mutable drawing target.
///
/// Implementations must tolerate rectangles that extend past their bounds;
/// only the overlapping part is painted.
pub trait Surface: Send {
    fn size(&self) -> Size;

    fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Paints `rect` (clipped to the surface) with `color`, replacing what was there.
    fn fill(&mut self, rect: Rect, color: Color);

    /// Reads back one pixel. Returns `None` outside the bounds, or when the
    /// surface does not keep pixel data at all.
    fn pixel(&self, p: Point) -> Option<Color>;
}

/// Allocates drawing surfaces. The loop calls this exactly once, at start.
pub trait SurfaceProvider {
    fn new_surface(&self, size: Size) -> Result<Box<dyn Surface>>;
}
