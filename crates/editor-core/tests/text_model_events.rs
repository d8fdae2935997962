use editor_core::{
    ContentChangedEvent, Position, TextBuffer, TextEdit, TextModel, TextRange, TextSnapshot,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn record_changes(model: &TextModel) -> Arc<Mutex<Vec<ContentChangedEvent>>> {
    let changes: Arc<Mutex<Vec<ContentChangedEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let changes_cb = changes.clone();
    model.on_did_change_content(Box::new(move |event| {
        changes_cb.lock().expect("lock").push(event.clone());
    }));
    changes
}

#[test]
fn test_insert_produces_content_change() {
    let model = TextModel::new("abc", "plaintext");
    let changes = record_changes(&model);

    model.insert(1, "X").unwrap();

    let changes = changes.lock().expect("lock");
    assert_eq!(changes.len(), 1);
    let event = &changes[0];
    assert_eq!(event.version_id, 1);
    assert_eq!(event.changes.len(), 1);
    assert_eq!(event.changes[0].range_offset, 1);
    assert_eq!(event.changes[0].range_length, 0);
    assert_eq!(event.changes[0].text, "X");
    assert_eq!(event.changes[0].new_end_offset(), 2);
}

#[test]
fn test_multi_edit_batch_ordering() {
    // Offsets in "a\nb\nc":
    // 0 'a'
    // 1 '\n'
    // 2 'b'
    // 3 '\n'
    // 4 'c'
    let model = TextModel::new("a\nb\nc", "plaintext");
    let changes = record_changes(&model);

    // Each edit is expressed against the document produced by the previous ones.
    model
        .apply_edits(&[
            TextEdit::insert(0, "- "),
            TextEdit::insert(4, "- "),
            TextEdit::insert(8, "- "),
        ])
        .unwrap();

    assert_eq!(model.get_value(), "- a\n- b\n- c");

    let changes = changes.lock().expect("lock");
    assert_eq!(changes.len(), 1);
    let ranges: Vec<TextRange> = changes[0].changes.iter().map(|c| c.range).collect();
    assert_eq!(
        ranges,
        vec![
            TextRange::on_line(0, 0, 0),
            TextRange::on_line(1, 0, 0),
            TextRange::on_line(2, 0, 0),
        ]
    );
}

#[test]
fn test_multiline_delete_range() {
    let model = TextModel::new("one\ntwo\nthree", "plaintext");
    let event = model.delete(2..9).unwrap();

    assert_eq!(model.get_value(), "onhree");
    assert_eq!(
        event.changes[0].range,
        TextRange::new(Position::new(0, 2), Position::new(2, 1))
    );
}

#[test]
fn test_value_in_range_widens_to_char_boundaries() {
    let model = TextModel::new("x你y", "plaintext");

    assert_eq!(model.value_in_range(2..3).unwrap(), "你");
    assert_eq!(model.value_in_range(4..100).unwrap(), "y");
    assert!(model.value_in_range(10..12).is_err());
}

#[test]
fn test_end_of_line_range_covers_line_break() {
    let model = TextModel::new("ab\r\ncd", "plaintext");

    assert_eq!(model.position_at(2).unwrap(), Position::new(0, 2));
    assert_eq!(model.line_content(0).unwrap(), "ab");
    assert_eq!(model.value_in_range(2..4).unwrap(), "\r\n");
}

#[test]
fn test_snapshot_is_isolated_from_later_edits() {
    let model = TextModel::new("hello world", "plaintext");
    model.set_snapshot_chunk_size(4);
    let mut snapshot: TextSnapshot = model.create_snapshot();

    model.replace(0..5, "HELLO").unwrap();

    let mut read = String::new();
    while let Some(chunk) = snapshot.read() {
        assert!(chunk.len() <= 4);
        read.push_str(&chunk);
    }
    assert_eq!(read, "hello world");
    assert_eq!(snapshot.version_id(), 0);
    assert_eq!(model.get_value(), "HELLO world");
}

#[test]
fn test_set_value_replaces_everything() {
    let model = TextModel::new("old\ncontent", "plaintext");
    let event = model.set_value("new").unwrap();

    assert_eq!(model.get_value(), "new");
    assert_eq!(model.line_count(), 1);
    assert_eq!(event.changes[0].range_length, 11);
    assert_eq!(
        event.changes[0].range,
        TextRange::new(Position::new(0, 0), Position::new(1, 7))
    );
}
