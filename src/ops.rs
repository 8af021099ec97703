// src/ops.rs

//! The operation algebra executed by the `Loop`.
//!
//! An `Operation` mutates the canvas and reports whether the surface is now
//! presentable ("ready"). Everything the loop runs is an operation: plain
//! fills, the update marker, composite lists, and the figure primitives in
//! [`figure`].
//!
//! Operations run on the loop's worker thread and must not block. They may
//! post further operations through a `LoopHandle`, which only enqueues.

mod figure;

pub use figure::{BackgroundRect, Figure, FigureId, FigureStyle, FigureTable, Move, ResetFill};

use crate::color::Color;
use crate::surface::Surface;
use std::fmt;

/// Tag identifying an operation variant, used for logging and batch inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fill,
    Update,
    List,
    BackgroundRect,
    Figure,
    Move,
}

/// Everything an operation may touch while it runs.
///
/// The worker owns both the surface and the figure table; operations borrow
/// them for the duration of a single `apply`.
pub struct Canvas<'a> {
    pub surface: &'a mut dyn Surface,
    pub figures: &'a mut FigureTable,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut dyn Surface, figures: &'a mut FigureTable) -> Self {
        Self { surface, figures }
    }
}

/// A unit of work applied to the canvas.
pub trait Operation: Send {
    /// Applies the operation. Returns `true` when the surface should be
    /// handed to the receiver afterwards.
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool;

    fn kind(&self) -> OperationKind;
}

pub type BoxedOperation = Box<dyn Operation>;

impl fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

/// Signature of the leaf fill routines.
pub type FillFn = fn(&mut dyn Surface);

/// Adapts a surface-mutating function into an operation. Never signals readiness.
pub struct OperationFn<F>(pub F);

impl<F> Operation for OperationFn<F>
where
    F: FnMut(&mut dyn Surface) + Send,
{
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        (self.0)(&mut *canvas.surface);
        false
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Fill
    }
}

/// Boxes a closure or fill routine as an operation.
pub fn operation_fn<F>(f: F) -> BoxedOperation
where
    F: FnMut(&mut dyn Surface) + Send + 'static,
{
    Box::new(OperationFn(f))
}

/// Changes nothing, but marks the surface as ready to display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Update;

impl Operation for Update {
    fn apply(&mut self, _canvas: &mut Canvas<'_>) -> bool {
        true
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Update
    }
}

/// Runs its members in order. Ready if any member was ready; every member
/// runs regardless.
#[derive(Default)]
pub struct OperationList(pub Vec<BoxedOperation>);

impl OperationList {
    pub fn new(ops: Vec<BoxedOperation>) -> Self {
        Self(ops)
    }
}

impl Operation for OperationList {
    fn apply(&mut self, canvas: &mut Canvas<'_>) -> bool {
        let mut ready = false;
        for op in &mut self.0 {
            ready |= op.apply(canvas);
        }
        ready
    }

    fn kind(&self) -> OperationKind {
        OperationKind::List
    }
}

impl From<Vec<BoxedOperation>> for OperationList {
    fn from(ops: Vec<BoxedOperation>) -> Self {
        Self(ops)
    }
}

/// Paints the whole surface white.
pub fn white_fill(surface: &mut dyn Surface) {
    fill_all(surface, Color::WHITE);
}

/// Paints the whole surface green.
pub fn green_fill(surface: &mut dyn Surface) {
    fill_all(surface, Color::GREEN);
}

/// Paints the whole surface black. This is the baseline laid down by `reset`.
pub fn black_fill(surface: &mut dyn Surface) {
    fill_all(surface, Color::BLACK);
}

fn fill_all(surface: &mut dyn Surface, color: Color) {
    let bounds = surface.bounds();
    surface.fill(bounds, color);
}
