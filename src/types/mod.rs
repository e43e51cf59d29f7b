//! Source positions and byte spans shared by the walker, builder and errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Half-open byte span `[start, end)` into the original source buffer.
///
/// `start` is the first byte of the first token of a subtree and `end` is the
/// byte just past its last token, so slicing the buffer with a span yields the
/// exact original text between those tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span from the start of `first` to the end of `last`.
    pub fn covering(first: Span, last: Span) -> Self {
        Self {
            start: first.start,
            end: last.end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Line/column of a node start. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A position inside a named source file, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, position: Position) -> Self {
        Self {
            file: file.into(),
            line: position.line,
            column: position.column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, {}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_covering() {
        let span = Span::covering(Span::new(4, 9), Span::new(12, 20));
        assert_eq!(span, Span::new(4, 20));
        assert_eq!(span.len(), 16);
        assert_eq!(span.as_range(), 4..20);
    }

    #[test]
    fn test_empty_span() {
        assert!(Span::new(7, 7).is_empty());
        assert!(!Span::from(3..5).is_empty());
    }

    #[test]
    fn test_location_display() {
        let location = SourceLocation::new("Foo.h", Position::new(12, 4));
        assert_eq!(location.to_string(), "Foo.h: 12, 4");
    }
}
