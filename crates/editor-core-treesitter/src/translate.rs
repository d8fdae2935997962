//! Translation between buffer coordinates and tree-sitter's.
//!
//! Both sides speak UTF-8 bytes: buffer offsets are byte offsets, buffer columns are byte
//! columns, and rows break on `\n` only (a `\r\n` pair counts once).

use editor_core::{BufferError, ContentChange, Position, TextBuffer};
use tree_sitter::{InputEdit, Point};

/// Convert a buffer position to a tree-sitter point.
pub fn point_for(position: Position) -> Point {
    Point {
        row: position.line,
        column: position.column,
    }
}

/// Convert a tree-sitter point to a buffer position.
pub fn position_for(point: Point) -> Position {
    Position::new(point.row, point.column)
}

/// The point reached after writing `text` starting at `point`.
pub fn advance_point(mut point: Point, text: &str) -> Point {
    let mut parts = text.split('\n');
    let Some(first) = parts.next() else {
        return point;
    };

    point.column = point.column.saturating_add(first.len());
    for part in parts {
        point.row = point.row.saturating_add(1);
        point.column = part.len();
    }

    point
}

/// Describe one applied change as a tree-sitter edit.
///
/// The change's range is in pre-edit coordinates, so a multi-change event must be fed to
/// [`tree_sitter::Tree::edit`] one change at a time, in order.
pub fn input_edit_for_change(change: &ContentChange) -> InputEdit {
    let start_position = point_for(change.range.start);
    InputEdit {
        start_byte: change.range_offset,
        old_end_byte: change.old_end_offset(),
        new_end_byte: change.new_end_offset(),
        start_position,
        old_end_position: point_for(change.range.end),
        new_end_position: advance_point(start_position, &change.text),
    }
}

/// Read live buffer content at `offset` for the parser.
///
/// Returns the rest of the line containing `offset`. At the end of a line the line break itself
/// is returned (two bytes' worth, enough for `\r\n`); at the end of the document the result is
/// empty, which the parser reads as end of input.
pub fn read_live(buffer: &dyn TextBuffer, offset: usize) -> Result<Vec<u8>, BufferError> {
    let position = buffer.position_at(offset)?;
    let line = buffer.line_content(position.line)?;
    if let Some(rest) = line.as_bytes().get(position.column..)
        && !rest.is_empty()
    {
        return Ok(rest.to_vec());
    }

    let end = offset.saturating_add(2).min(buffer.len());
    Ok(buffer.value_in_range(offset..end)?.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::{TextModel, TextRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_advance_point() {
        let start = Point { row: 2, column: 4 };
        assert_eq!(advance_point(start, ""), start);
        assert_eq!(advance_point(start, "abc"), Point { row: 2, column: 7 });
        assert_eq!(
            advance_point(start, "ab\ncd\r\nxyz"),
            Point { row: 4, column: 3 }
        );
        assert_eq!(advance_point(start, "\n"), Point { row: 3, column: 0 });
    }

    #[test]
    fn test_insert_edit() {
        let change = ContentChange {
            range_offset: 10,
            range_length: 0,
            text: "let x;\n".to_string(),
            range: TextRange::new(Position::new(1, 3), Position::new(1, 3)),
        };

        let edit = input_edit_for_change(&change);
        assert_eq!(edit.start_byte, 10);
        assert_eq!(edit.old_end_byte, 10);
        assert_eq!(edit.new_end_byte, 17);
        assert_eq!(edit.start_position, Point { row: 1, column: 3 });
        assert_eq!(edit.old_end_position, Point { row: 1, column: 3 });
        assert_eq!(edit.new_end_position, Point { row: 2, column: 0 });
    }

    #[test]
    fn test_replace_edit_across_lines() {
        let change = ContentChange {
            range_offset: 4,
            range_length: 9,
            text: "xy".to_string(),
            range: TextRange::new(Position::new(0, 4), Position::new(2, 1)),
        };

        let edit = input_edit_for_change(&change);
        assert_eq!(edit.old_end_byte, 13);
        assert_eq!(edit.new_end_byte, 6);
        assert_eq!(edit.old_end_position, Point { row: 2, column: 1 });
        assert_eq!(edit.new_end_position, Point { row: 0, column: 6 });
    }

    #[test]
    fn test_read_live_returns_rest_of_line() {
        let model = TextModel::new("fn a() {}\nlet b = 1;\n", "rust");
        assert_eq!(read_live(&model, 0).unwrap(), b"fn a() {}".to_vec());
        assert_eq!(read_live(&model, 14).unwrap(), b"b = 1;".to_vec());
    }

    #[test]
    fn test_read_live_at_line_end_returns_line_break() {
        let model = TextModel::new("ab\r\ncd", "rust");
        assert_eq!(read_live(&model, 2).unwrap(), b"\r\n".to_vec());
        assert_eq!(read_live(&model, 6).unwrap(), Vec::<u8>::new());

        let model = TextModel::new("ab\ncd", "rust");
        assert_eq!(read_live(&model, 2).unwrap(), b"\nc".to_vec());
    }

    #[test]
    fn test_read_live_past_end_is_an_error() {
        let model = TextModel::new("ab", "rust");
        assert!(read_live(&model, 3).is_err());
    }
}
