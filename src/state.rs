// src/state.rs

//! `PainterState` accumulates script commands into one ordered batch.
//!
//! Whatever order the commands arrived in, a batch is laid out as
//!
//! 1. background fill (last `white`/`green`/`reset` wins)
//! 2. background rectangle (last `bgrect` wins)
//! 3. moves, in declaration order
//! 4. figures, in declaration order
//! 5. the update marker, if the update flag is set
//!
//! Moves come before figures because figures read their displacement at draw
//! time: every move targeting a figure has to be applied before it is drawn.

use crate::config::StyleConfig;
use crate::lang::Command;
use crate::ops::{
    black_fill, green_fill, white_fill, BackgroundRect, BoxedOperation, Figure, FigureId,
    FillFn, Move, OperationFn, ResetFill, Update,
};
use crate::surface::Point;
use log::{debug, trace};

#[derive(Default)]
pub struct PainterState {
    style: StyleConfig,
    background: Option<FillFn>,
    background_rect: Option<BackgroundRect>,
    figures: Vec<Figure>,
    moves: Vec<Move>,
    update: bool,
    /// Figures dropped by `reset` whose displacement the loop still holds.
    forgotten: Vec<FigureId>,
}

impl PainterState {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Replaces the background fill.
    pub fn set_background(&mut self, fill: FillFn) {
        self.background = Some(fill);
    }

    /// Replaces the background rectangle.
    pub fn set_background_rect(&mut self, top_left: Point, bottom_right: Point) {
        self.background_rect = Some(BackgroundRect::new(
            top_left,
            bottom_right,
            self.style.background_rect,
        ));
    }

    /// Declares a figure. It becomes a target of every move declared after it.
    pub fn add_figure(&mut self, center: Point) -> FigureId {
        let figure = Figure::new(center, self.style.figure);
        trace!("PainterState: Figure {:?} at {:?}", figure.id(), center);
        self.figures.push(figure);
        figure.id()
    }

    /// Declares a move of every figure declared so far.
    pub fn add_move(&mut self, dx: i32, dy: i32) {
        let targets: Vec<FigureId> = self.figures.iter().map(Figure::id).collect();
        trace!("PainterState: Move ({}, {}) of {} figures", dx, dy, targets.len());
        self.moves.push(Move::new(Point::new(dx, dy), targets));
    }

    pub fn update(&mut self) {
        self.update = true;
    }

    /// Drops everything and starts over from a presentable black canvas.
    pub fn reset(&mut self) {
        debug!("PainterState: Reset");
        self.background_rect = None;
        self.forgotten.extend(self.figures.iter().map(Figure::id));
        self.figures.clear();
        self.moves.clear();
        self.update = true;
        self.set_background(black_fill);
    }

    /// Applies one parsed command.
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::White => self.set_background(white_fill),
            Command::Green => self.set_background(green_fill),
            Command::BgRect {
                top_left,
                bottom_right,
            } => self.set_background_rect(top_left, bottom_right),
            Command::Figure { center } => {
                self.add_figure(center);
            }
            Command::Move { dx, dy } => self.add_move(dx, dy),
            Command::Update => self.update(),
            Command::Reset => self.reset(),
        }
    }

    /// Builds the batch for everything accumulated so far.
    ///
    /// Pending moves are handed out once and then forgotten; the figures they
    /// displaced keep that displacement in the loop's figure table. Background,
    /// rectangle and figures are emitted again on every load so that each batch
    /// repaints the whole scene. The first batch after a `reset` uses a
    /// `ResetFill`, which also drops the discarded figures from the table.
    pub fn load_operations(&mut self) -> Vec<BoxedOperation> {
        let mut ops: Vec<BoxedOperation> = Vec::new();

        if let Some(fill) = self.background {
            if self.forgotten.is_empty() {
                ops.push(Box::new(OperationFn(fill)));
            } else {
                let forgotten = std::mem::take(&mut self.forgotten);
                ops.push(Box::new(ResetFill::new(fill, forgotten)));
            }
        }
        if let Some(rect) = self.background_rect {
            ops.push(Box::new(rect));
        }
        for mv in self.moves.drain(..) {
            ops.push(Box::new(mv));
        }
        for figure in &self.figures {
            ops.push(Box::new(*figure));
        }
        if self.update {
            ops.push(Box::new(Update));
        }

        debug!("PainterState: Loaded {} operations", ops.len());
        ops
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn pending_moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn is_update_requested(&self) -> bool {
        self.update
    }

    /// True if a load would produce no operations.
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.background_rect.is_none()
            && self.figures.is_empty()
            && self.moves.is_empty()
            && !self.update
    }
}
