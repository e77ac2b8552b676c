//! The interpreter's error taxonomy.
//!
//! Four distinct kinds, matching the source's exception hierarchy:
//! `IllegalCharError`, `ExpectedCharError`, `InvalidSyntaxError`,
//! `RuntimeError`. These propagate up through lexing, parsing, and
//! evaluation unchanged and are formatted only by the top-level driver.

use thiserror::Error;

use crate::position::Position;

/// A semantic error raised during evaluation, carrying the chain of context
/// names (innermost last) active when it was raised.
#[derive(Clone, Debug)]
pub struct Traceback(pub Vec<String>);

#[derive(Error, Clone, Debug)]
pub enum PolyscriptError {
    #[error("IllegalCharError: '{ch}'")]
    IllegalChar { ch: char, pos: Position },

    #[error("ExpectedCharError: '{expected}'")]
    ExpectedChar { expected: char, pos: Position },

    #[error("InvalidSyntaxError: {message}")]
    InvalidSyntax { message: String, start: Position, end: Position },

    #[error("RuntimeError: {message}")]
    Runtime {
        message: String,
        start: Position,
        end: Position,
        traceback: Traceback,
    },
}

impl PolyscriptError {
    pub fn illegal_char(ch: char, pos: Position) -> Self {
        Self::IllegalChar { ch, pos }
    }

    pub fn expected_char(expected: char, pos: Position) -> Self {
        Self::ExpectedChar { expected, pos }
    }

    pub fn invalid_syntax(message: impl Into<String>, start: Position, end: Position) -> Self {
        Self::InvalidSyntax { message: message.into(), start, end }
    }

    pub fn runtime(message: impl Into<String>, start: Position, end: Position) -> Self {
        Self::Runtime {
            message: message.into(),
            start,
            end,
            traceback: Traceback(Vec::new()),
        }
    }

    /// Returns the start/end span this error should be reported at.
    pub fn span(&self) -> (&Position, &Position) {
        match self {
            Self::IllegalChar { pos, .. } => (pos, pos),
            Self::ExpectedChar { pos, .. } => (pos, pos),
            Self::InvalidSyntax { start, end, .. } => (start, end),
            Self::Runtime { start, end, .. } => (start, end),
        }
    }

    /// Records a call frame on the traceback. Called once per frame as the
    /// error unwinds from innermost call outward, so each new frame is
    /// inserted ahead of the ones already recorded — the final order reads
    /// outermost first, innermost last.
    pub fn with_context(mut self, name: impl Into<String>) -> Self {
        if let Self::Runtime { traceback, .. } = &mut self {
            traceback.0.insert(0, name.into());
        }
        self
    }
}
