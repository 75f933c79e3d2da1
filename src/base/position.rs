/// Position tracking for document paths
///
/// Stores the source location of every logical path recorded while the
/// semantic document is built, for hover, cursor resolution and problem
/// reporting.
use text_size::{TextRange, TextSize};

/// A span in source code: line/column boundaries plus the byte range.
///
/// Lines are 1-based, columns are 0-based. `end.column` points just past the
/// last character of the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Span {
    pub start: Position,
    pub end: Position,
    #[cfg_attr(feature = "json", serde(skip))]
    pub range: TextRange,
}

/// A line/column position in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position, range: TextRange) -> Self {
        Self { start, end, range }
    }

    /// Create a span from line/column coordinates and byte offsets
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
        range: TextRange,
    ) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
            range,
        }
    }

    pub fn start_offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn end_offset(&self) -> TextSize {
        self.range.end()
    }

    /// Character extent used to rank overlapping spans.
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Span {
        let start = if self.range.start() <= other.range.start() {
            self.start
        } else {
            other.start
        };
        let end = if self.range.end() >= other.range.end() {
            self.end
        } else {
            other.end
        };
        Span::new(start, end, self.range.cover(other.range))
    }

    /// Check if a position falls within this span (both ends inclusive)
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.column < self.start.column {
            return false;
        }
        if position.line == self.end.line && position.column > self.end.column {
            return false;
        }
        true
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
