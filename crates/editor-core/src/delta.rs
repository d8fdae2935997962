//! Structured text change records.
//!
//! Incremental consumers (incremental parsing, bracket scanners, indexing) need **structured
//! edits** without diffing old/new text. A [`ContentChangedEvent`] carries every change made by
//! one [`TextModel::apply_edits`](crate::TextModel::apply_edits) call, in application order.
//!
//! All offsets are UTF-8 byte offsets; positions use byte columns.

use crate::position::TextRange;
use std::ops::Range;

/// An edit requested by the host.
///
/// `range` is expressed in the document **as it stands when this edit is applied**, i.e. after
/// any edit that precedes it in the same batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte range being replaced.
    pub range: Range<usize>,
    /// Replacement text (may be empty).
    pub text: String,
}

impl TextEdit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }

    /// Delete `range`.
    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }

    /// Replace `range` with `text`.
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// A single applied change.
///
/// `range_offset`, `range_length` and `range` describe the replaced region in the document as it
/// stood immediately before this change was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Start byte offset of the replaced region.
    pub range_offset: usize,
    /// Byte length of the replaced region.
    pub range_length: usize,
    /// Inserted text.
    pub text: String,
    /// Replaced region as (line, byte column) positions, pre-edit.
    pub range: TextRange,
}

impl ContentChange {
    /// Exclusive end of the replaced region, pre-edit.
    pub fn old_end_offset(&self) -> usize {
        self.range_offset + self.range_length
    }

    /// Exclusive end of the inserted text, post-edit.
    pub fn new_end_offset(&self) -> usize {
        self.range_offset + self.text.len()
    }
}

/// Fired after the model content changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChangedEvent {
    /// Ordered list of changes. Apply them in order to transform the old content into the new.
    pub changes: Vec<ContentChange>,
    /// Model version after the changes.
    pub version_id: u64,
}

impl ContentChangedEvent {
    /// Returns `true` if this event contains no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Fired after the model's language id changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChangedEvent {
    /// Previous language id.
    pub old_language: String,
    /// New language id.
    pub new_language: String,
}
