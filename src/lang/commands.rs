// src/lang/commands.rs

//! Defines the `Command` enum produced by the parser, and the closed set of
//! command words it recognises.

use crate::surface::Point;

/// One parsed script line, with coordinates already scaled to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    White,
    Green,
    BgRect { top_left: Point, bottom_right: Point },
    Figure { center: Point },
    Move { dx: i32, dy: i32 },
    Update,
    Reset,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::White => Keyword::White.name(),
            Command::Green => Keyword::Green.name(),
            Command::BgRect { .. } => Keyword::BgRect.name(),
            Command::Figure { .. } => Keyword::Figure.name(),
            Command::Move { .. } => Keyword::Move.name(),
            Command::Update => Keyword::Update.name(),
            Command::Reset => Keyword::Reset.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Keyword {
    White,
    Green,
    BgRect,
    Figure,
    Move,
    Update,
    Reset,
}

impl Keyword {
    pub(super) fn from_word(word: &str) -> Option<Self> {
        match word {
            "white" => Some(Keyword::White),
            "green" => Some(Keyword::Green),
            "bgrect" => Some(Keyword::BgRect),
            "figure" => Some(Keyword::Figure),
            "move" => Some(Keyword::Move),
            "update" => Some(Keyword::Update),
            "reset" => Some(Keyword::Reset),
            _ => None,
        }
    }

    pub(super) fn name(self) -> &'static str {
        match self {
            Keyword::White => "white",
            Keyword::Green => "green",
            Keyword::BgRect => "bgrect",
            Keyword::Figure => "figure",
            Keyword::Move => "move",
            Keyword::Update => "update",
            Keyword::Reset => "reset",
        }
    }

    /// Number of coordinate arguments the command takes.
    pub(super) fn arity(self) -> usize {
        match self {
            Keyword::BgRect => 4,
            Keyword::Figure | Keyword::Move => 2,
            Keyword::White | Keyword::Green | Keyword::Update | Keyword::Reset => 0,
        }
    }

    /// Builds the command. `coords` must hold exactly `arity()` values.
    pub(super) fn build(self, coords: &[i32]) -> Command {
        debug_assert_eq!(coords.len(), self.arity());
        match self {
            Keyword::White => Command::White,
            Keyword::Green => Command::Green,
            Keyword::BgRect => Command::BgRect {
                top_left: Point::new(coords[0], coords[1]),
                bottom_right: Point::new(coords[2], coords[3]),
            },
            Keyword::Figure => Command::Figure {
                center: Point::new(coords[0], coords[1]),
            },
            Keyword::Move => Command::Move {
                dx: coords[0],
                dy: coords[1],
            },
            Keyword::Update => Command::Update,
            Keyword::Reset => Command::Reset,
        }
    }
}
