// src/surface/buffer.rs
//! In-memory RGBA surface and the provider that hands it to the loop.

use super::{Point, Rect, Size, Surface, SurfaceProvider};
use crate::color::Color;
use anyhow::{bail, Result};
use log::{debug, trace};

/// A row-major pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Allocates a buffer with every pixel transparent.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Color::TRANSPARENT; size.area()],
        }
    }

    /// Copies the visible contents of any surface into an owned buffer.
    ///
    /// Pixels the source cannot report are left transparent.
    pub fn snapshot_of(surface: &dyn Surface) -> Self {
        let mut copy = Self::new(surface.size());
        let bounds = copy.bounds();
        for y in bounds.min().y..bounds.max().y {
            for x in bounds.min().x..bounds.max().x {
                if let Some(color) = surface.pixel(Point::new(x, y)) {
                    let idx = copy.index(x, y);
                    copy.pixels[idx] = color;
                }
            }
        }
        copy
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> Size {
        self.size
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            trace!("PixelBuffer: fill {:?} lies outside the surface", rect);
            return;
        }
        let width = self.size.width as usize;
        let (x0, x1) = (clipped.min().x as usize, clipped.max().x as usize);
        for y in clipped.min().y as usize..clipped.max().y as usize {
            self.pixels[y * width + x0..y * width + x1].fill(color);
        }
    }

    fn pixel(&self, p: Point) -> Option<Color> {
        if !self.bounds().contains(p) {
            return None;
        }
        self.pixels.get(self.index(p.x, p.y)).copied()
    }
}

/// Hands out `PixelBuffer`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferProvider;

impl SurfaceProvider for BufferProvider {
    fn new_surface(&self, size: Size) -> Result<Box<dyn Surface>> {
        if size.is_empty() {
            bail!(
                "Cannot allocate a {}x{} surface: both dimensions must be non-zero",
                size.width,
                size.height
            );
        }
        debug!("BufferProvider: Allocating {}x{} surface", size.width, size.height);
        Ok(Box::new(PixelBuffer::new(size)))
    }
}
