// src/lang/error.rs
//! Error type for script parsing.

use std::fmt;
use std::io;

/// Why a script was rejected. Line numbers are 1-based.
#[derive(Debug)]
pub enum ParseError {
    UnknownCommand {
        line: usize,
        command: String,
    },
    WrongArity {
        line: usize,
        command: &'static str,
        expected: usize,
        found: usize,
    },
    InvalidNumber {
        line: usize,
        token: String,
    },
    /// Reading the script failed.
    Io(io::Error),
}

impl ParseError {
    /// The offending line, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnknownCommand { line, .. }
            | ParseError::WrongArity { line, .. }
            | ParseError::InvalidNumber { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand { line, command } => {
                write!(f, "line {line}: unknown command {command:?}")
            }
            ParseError::WrongArity {
                line,
                command,
                expected,
                found,
            } => write!(
                f,
                "line {line}: {command} takes {expected} argument(s), got {found}"
            ),
            ParseError::InvalidNumber { line, token } => {
                write!(f, "line {line}: cannot convert coordinate {token:?}")
            }
            ParseError::Io(e) => write!(f, "failed to read script: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}
