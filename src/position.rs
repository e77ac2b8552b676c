//! Source position tracking.

use std::fmt;

/// A point in source text: file name, byte index, 1-based line, 1-based column.
///
/// Every token and AST node carries a `(start, end)` pair of positions used
/// for diagnostics.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    pub file_name: String,
    pub index:     usize,
    pub line:      usize,
    pub column:    usize,
}

impl Position {
    /// Creates a position at the start of `file_name`.
    pub fn start(file_name: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), index: 0, line: 1, column: 1 }
    }

    /// Advances past `ch`, resetting the column and incrementing the line on
    /// `\n`.
    pub fn advance(&mut self, ch: Option<char>) {
        self.index += 1;
        self.column += 1;
        if ch == Some('\n') {
            self.line += 1;
            self.column = 1;
        }
    }

    /// Returns a copy of this position, useful when a span needs its own
    /// independent start/end instances.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name, self.line, self.column)
    }
}

/// A `(start, end)` pair delimiting the source text of a token or AST node.
///
/// `end.index` is always `>= start.index`. Every node's span contains the
/// spans of its children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Span {
    pub start: Position,
    pub end:   Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.index >= start.index);
        Self { start, end }
    }

    /// Builds a span covering exactly `start` (a single zero-width point,
    /// used while a token is still being scanned).
    pub fn point(pos: Position) -> Self {
        let end = pos.clone();
        Self { start: pos, end }
    }

    /// Returns a new span covering from `self.start` to `other.end`.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.start.clone(), other.end.clone())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_column() {
        let mut pos = Position::start("<stdin>");
        pos.advance(Some('a'));
        assert_eq!(pos.index, 1);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn advance_on_newline_resets_column() {
        let mut pos = Position::start("<stdin>");
        pos.advance(Some('\n'));
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn span_end_never_precedes_start() {
        let start = Position::start("<stdin>");
        let end = start.clone();
        let span = Span::new(start, end);
        assert!(span.end.index >= span.start.index);
    }
}
