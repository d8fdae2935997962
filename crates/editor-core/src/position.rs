//! Logical positions and ranges.
//!
//! All coordinates are zero-based. Columns are measured in UTF-8 bytes from the start of the
//! logical line, which is the unit Tree-sitter uses for `Point::column`.

use std::cmp::Ordering;

/// A logical (line, column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based byte column within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A range between two logical positions.
///
/// `start <= end` is maintained by [`TextRange::new`]. Containment checks treat both ends as
/// inclusive, so a caret sitting right after a token is still "in" that token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl TextRange {
    /// Create a range, swapping the ends if they are reversed.
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// A range on a single line.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(
            Position::new(line, start_column),
            Position::new(line, end_column),
        )
    }

    /// Returns `true` if the range starts and ends at the same position.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `position` lies within the range (ends inclusive).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Returns `true` if `other` lies entirely within this range.
    pub fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
