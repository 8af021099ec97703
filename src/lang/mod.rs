// src/lang/mod.rs

//! The drawing script language.
//!
//! One command per line, tokens separated by whitespace, blank lines ignored:
//!
//! | Command  | Arguments       |
//! |----------|-----------------|
//! | `white`  |                 |
//! | `green`  |                 |
//! | `bgrect` | `x1 y1 x2 y2`   |
//! | `figure` | `x y`           |
//! | `move`   | `dx dy`         |
//! | `update` |                 |
//! | `reset`  |                 |
//!
//! Coordinates are normalised floats scaled to pixels (x800 by default).

mod commands;
mod error;
mod parser;

pub use commands::Command;
pub use error::ParseError;
pub use parser::{Parser, DEFAULT_COORDINATE_SCALE};
