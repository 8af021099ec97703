// src/lang/parser.rs

//! Turns script text into operation batches.
//!
//! A `Parser` is one drawing session: it owns the `PainterState` that every
//! parsed script accumulates into, so figures declared by one script can be
//! moved by a later one. Each script is parsed completely before any of its
//! commands reaches the state; a script with an error leaves the session
//! untouched and yields no operations.

use super::commands::{Command, Keyword};
use super::error::ParseError;
use crate::config::Config;
use crate::ops::BoxedOperation;
use crate::state::PainterState;
use log::{debug, warn};
use std::io::BufRead;

/// Factor applied to normalised script coordinates.
pub const DEFAULT_COORDINATE_SCALE: f64 = 800.0;

pub struct Parser {
    state: PainterState,
    scale: f64,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: PainterState::default(),
            scale: DEFAULT_COORDINATE_SCALE,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Parser {
            state: PainterState::new(config.style),
            scale: config.script.coordinate_scale,
        }
    }

    /// Parses a whole script and returns the session's next batch.
    ///
    /// # Errors
    /// The first malformed line (or read failure) aborts the script.
    pub fn parse<R: BufRead>(&mut self, input: R) -> Result<Vec<BoxedOperation>, ParseError> {
        let mut commands = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            match self.parse_line(&line, idx + 1) {
                Ok(Some(command)) => commands.push(command),
                Ok(None) => {}
                Err(e) => {
                    warn!("Parser: Rejecting script: {}", e);
                    return Err(e);
                }
            }
        }

        debug!("Parser: Parsed {} commands", commands.len());
        for command in &commands {
            self.state.apply(command);
        }
        Ok(self.state.load_operations())
    }

    pub fn parse_str(&mut self, script: &str) -> Result<Vec<BoxedOperation>, ParseError> {
        self.parse(script.as_bytes())
    }

    /// Parses a single line. Blank lines yield `Ok(None)`.
    pub fn parse_line(&self, line: &str, line_no: usize) -> Result<Option<Command>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Ok(None);
        };
        let keyword = Keyword::from_word(word).ok_or_else(|| ParseError::UnknownCommand {
            line: line_no,
            command: word.to_string(),
        })?;

        let args: Vec<&str> = tokens.collect();
        if args.len() != keyword.arity() {
            return Err(ParseError::WrongArity {
                line: line_no,
                command: keyword.name(),
                expected: keyword.arity(),
                found: args.len(),
            });
        }

        let coords = args
            .iter()
            .map(|token| self.parse_coordinate(token, line_no))
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(Some(keyword.build(&coords)))
    }

    /// Scales a normalised coordinate to pixels, truncating toward zero.
    fn parse_coordinate(&self, token: &str, line_no: usize) -> Result<i32, ParseError> {
        let invalid = || ParseError::InvalidNumber {
            line: line_no,
            token: token.to_string(),
        };
        let value: f64 = token.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok((value * self.scale) as i32)
    }

    pub fn state(&self) -> &PainterState {
        &self.state
    }
}
