//! Logical Line Index
//!
//! Provides efficient line indexing using the Rope data structure, supporting O(log N) access and
//! editing. Offsets are UTF-8 byte offsets; columns are byte columns within a logical line.

use crate::line_ending::LineEnding;
use crate::position::Position;
use ropey::Rope;
use std::ops::Range;

/// Logical line index - implemented using Rope data structure
///
/// Only `'\n'` terminates a line (a `"\r\n"` pair is one break), which matches the row
/// counting Tree-sitter performs while parsing.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Rope data structure that automatically manages line indexing
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Borrow the underlying rope.
    ///
    /// Cloning a `Rope` is cheap (structural sharing), which is what snapshots rely on.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Get total line count (an empty document has one line)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total byte count
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Byte offset of the first byte of `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_byte(line))
    }

    /// Get text of the specified line (excluding the line break)
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let raw = self.rope.line(line).to_string();
        Some(LineEnding::strip_trailing(&raw).to_string())
    }

    /// Byte length of the specified line (excluding the line break)
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line_text(line).map(|text| text.len())
    }

    /// Convert a byte offset into a (line, byte column) position.
    ///
    /// Returns `None` if `offset` is past the end of the document.
    pub fn offset_to_position(&self, offset: usize) -> Option<Position> {
        if offset > self.rope.len_bytes() {
            return None;
        }
        let line = self.rope.byte_to_line(offset);
        let line_start = self.rope.line_to_byte(line);
        Some(Position::new(line, offset - line_start))
    }

    /// Convert a (line, byte column) position into a byte offset.
    ///
    /// Columns past the end of the line are clamped to the line end; lines past the end of the
    /// document return `None`.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line_start = self.line_start(position.line)?;
        let line_len = self.line_len(position.line)?;
        Some(line_start + position.column.min(line_len))
    }

    /// Returns `true` if `offset` falls on a UTF-8 character boundary.
    pub fn is_char_boundary(&self, offset: usize) -> bool {
        offset <= self.rope.len_bytes() && self.floor_char_boundary(offset) == offset
    }

    /// Largest character boundary `<= offset` (clamped to the document length).
    pub fn floor_char_boundary(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        self.rope.char_to_byte(self.rope.byte_to_char(offset))
    }

    /// Smallest character boundary `>= offset` (clamped to the document length).
    pub fn ceil_char_boundary(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        let char_idx = self.rope.byte_to_char(offset);
        let floor = self.rope.char_to_byte(char_idx);
        if floor == offset {
            offset
        } else {
            self.rope.char_to_byte(char_idx + 1)
        }
    }

    /// Extract the text of a byte range.
    ///
    /// The range is clamped to the document and widened to character boundaries.
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = self.floor_char_boundary(range.start);
        let end = self.ceil_char_boundary(range.end.max(start));
        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.slice(start_char..end_char).to_string()
    }

    /// Replace a byte range with `text`.
    ///
    /// Callers must pass a range whose ends are character boundaries within the document.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let start_char = self.rope.byte_to_char(range.start);
        let end_char = self.rope.byte_to_char(range.end);
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
        if !text.is_empty() {
            self.rope.insert(start_char, text);
        }
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.byte_count(), 0);
        assert_eq!(index.char_count(), 0);
    }

    #[test]
    fn test_from_text() {
        let text = "Line 1\nLine 2\nLine 3";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.byte_count(), text.len());
        assert_eq!(index.char_count(), text.chars().count());
    }

    #[test]
    fn test_offset_to_position() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.offset_to_position(0), Some(Position::new(0, 0)));
        assert_eq!(index.offset_to_position(3), Some(Position::new(0, 3)));
        assert_eq!(index.offset_to_position(4), Some(Position::new(1, 0)));
        assert_eq!(index.offset_to_position(11), Some(Position::new(2, 3)));
        assert_eq!(index.offset_to_position(12), None);
    }

    #[test]
    fn test_position_to_offset_clamps_column() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.position_to_offset(Position::new(1, 0)), Some(4));
        assert_eq!(index.position_to_offset(Position::new(1, 99)), Some(7));
        assert_eq!(index.position_to_offset(Position::new(3, 0)), None);
    }

    #[test]
    fn test_utf8_columns_are_bytes() {
        let index = LineIndex::from_text("你好\n世界");

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_len(0), Some(6));
        assert_eq!(index.offset_to_position(7), Some(Position::new(1, 0)));
        assert_eq!(index.offset_to_position(10), Some(Position::new(1, 3)));
    }

    #[test]
    fn test_char_boundaries() {
        let index = LineIndex::from_text("a你b");

        assert!(index.is_char_boundary(1));
        assert!(!index.is_char_boundary(2));
        assert_eq!(index.floor_char_boundary(2), 1);
        assert_eq!(index.ceil_char_boundary(2), 4);
        assert_eq!(index.slice(2..3), "你");
    }

    #[test]
    fn test_crlf_lines() {
        let index = LineIndex::from_text("ab\r\ncd\r\n");

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_text(0).as_deref(), Some("ab"));
        assert_eq!(index.line_text(1).as_deref(), Some("cd"));
        assert_eq!(index.line_text(2).as_deref(), Some(""));
        assert_eq!(index.line_start(1), Some(4));
    }

    #[test]
    fn test_replace() {
        let mut index = LineIndex::from_text("Hello World");

        index.replace(6..6, "Beautiful ");
        assert_eq!(index.get_text(), "Hello Beautiful World");

        index.replace(6..16, "");
        assert_eq!(index.get_text(), "Hello World");

        index.replace(0..5, "Goodbye");
        assert_eq!(index.get_text(), "Goodbye World");
    }

    #[test]
    fn test_large_document() {
        let text = (0..10000)
            .map(|i| format!("Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let index = LineIndex::from_text(&text);
        assert_eq!(index.line_count(), 10000);
        assert_eq!(index.line_text(5000).as_deref(), Some("Line 5000"));
    }
}
