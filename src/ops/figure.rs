// src/ops/figure.rs
//! Background rectangle, figure and move primitives.
//!
//! Figures are addressed by `FigureId`. A `Move` records the ids that existed
//! when it was declared and, when applied, adds its displacement to those
//! entries of the worker-owned `FigureTable`. A `Figure` draws at its declared
//! origin plus whatever displacement the table has accumulated for it, so a
//! figure must be applied after every move that targets it.

use super::{Canvas, FillFn, Operation, OperationKind};
use crate::color::Color;
use crate::surface::{Point, Rect};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of a declared figure. Unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureId(u64);

impl FigureId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        FigureId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Accumulated displacement per figure. Owned by the loop worker.
#[derive(Debug, Default, Clone)]
pub struct FigureTable {
    offsets: HashMap<FigureId, Point>,
}

impl FigureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, id: FigureId, delta: Point) {
        *self.offsets.entry(id).or_default() += delta;
    }

    /// Total displacement applied to `id` so far (zero if never moved).
    pub fn offset(&self, id: FigureId) -> Point {
        self.offsets.get(&id).copied().unwrap_or_default()
    }

    /// Current center of a figure declared at `origin`.
    pub fn position(&self, id: FigureId, origin: Point) -> Point {
        origin + self.offset(id)
    }

    /// Drops the displacement recorded for `id`.
    pub fn forget(&mut self, id: FigureId) {
        self.offsets.remove(&id);
    }

    /// Number of figures with a recorded displacement.
    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

/// Geometry and color of the cross drawn for each figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
    /// Length of each arm of the cross, end to end.
    pub length: i32,
    pub thickness: i32,
    pub color: Color,
}

impl Default for FigureStyle {
    fn default() -> Self {
        FigureStyle {
            length: 400,
            thickness: 100,
            color: Color::BLUE,
        }
    }
}

/// Fills a rectangular region with a fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundRect {
    pub rect: Rect,
    pub color: Color,
}

impl BackgroundRect {
    pub fn new(top_left: Point, bottom_right: Point, color: Color) -> Self {
        Self {
            rect: Rect::from_corners(top_left, bottom_right),
            color,
        }
    }
}

impl Operation for BackgroundRect {
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        canvas.surface.fill(self.rect, self.color);
        false
    }

    fn kind(&self) -> OperationKind {
        OperationKind::BackgroundRect
    }
}

/// A cross made of two overlapping rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    id: FigureId,
    origin: Point,
    style: FigureStyle,
}

impl Figure {
    /// Declares a new figure centred at `origin`, with a fresh id.
    pub fn new(origin: Point, style: FigureStyle) -> Self {
        Self {
            id: FigureId::next(),
            origin,
            style,
        }
    }

    pub fn id(&self) -> FigureId {
        self.id
    }

    /// Center as declared, before any move.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }
}

impl Operation for Figure {
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        let center = canvas.figures.position(self.id, self.origin);
        let FigureStyle {
            length,
            thickness,
            color,
        } = self.style;
        trace!("Figure {:?}: drawing at {:?}", self.id, center);

        canvas.surface.fill(Rect::centered(center, length, thickness), color);
        canvas.surface.fill(Rect::centered(center, thickness, length), color);
        false
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Figure
    }
}

/// Background fill of the first batch after a reset. Besides painting, it
/// drops the table entries of the figures the reset discarded.
#[derive(Clone)]
pub struct ResetFill {
    fill: FillFn,
    forgotten: Vec<FigureId>,
}

impl ResetFill {
    pub fn new(fill: FillFn, forgotten: Vec<FigureId>) -> Self {
        Self { fill, forgotten }
    }

    pub fn forgotten(&self) -> &[FigureId] {
        &self.forgotten
    }
}

impl Operation for ResetFill {
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        for id in &self.forgotten {
            canvas.figures.forget(*id);
        }
        trace!("ResetFill: forgot {} figures", self.forgotten.len());
        (self.fill)(&mut *canvas.surface);
        false
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Fill
    }
}

/// Displaces the figures that existed when the move was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    delta: Point,
    targets: Vec<FigureId>,
}

impl Move {
    pub fn new(delta: Point, targets: Vec<FigureId>) -> Self {
        Self { delta, targets }
    }

    pub fn delta(&self) -> Point {
        self.delta
    }

    pub fn targets(&self) -> &[FigureId] {
        &self.targets
    }
}

impl Operation for Move {
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        for id in &self.targets {
            canvas.figures.translate(*id, self.delta);
        }
        false
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Move
    }
}
