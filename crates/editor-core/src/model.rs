//! The live text model.
//!
//! [`TextModel`] is the mutable document that parsers and scanners observe. It owns the text (via
//! [`LineIndex`]), a version counter, the document's language id and two listener lists:
//!
//! - content listeners, fired with a [`ContentChangedEvent`] after every successful edit batch
//! - language listeners, fired with a [`LanguageChangedEvent`] after the language id changes
//!
//! Listeners run synchronously on the editing thread, after the model's internal lock has been
//! released, so they may freely read the model. The model expects a single writer at a time.
//!
//! Consumers that only need read access and events should depend on the [`TextBuffer`] trait.

use crate::delta::{ContentChange, ContentChangedEvent, LanguageChangedEvent, TextEdit};
use crate::line_index::LineIndex;
use crate::position::{Position, TextRange};
use crate::snapshot::{DEFAULT_SNAPSHOT_CHUNK_SIZE, TextSnapshot};
use parking_lot::{Mutex, RwLock};
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Handle returned when registering a listener; pass it to [`TextBuffer::remove_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Content change callback type.
pub type ContentChangeListener = Box<dyn Fn(&ContentChangedEvent) + Send + Sync>;

/// Language change callback type.
pub type LanguageChangeListener = Box<dyn Fn(&LanguageChangedEvent) + Send + Sync>;

/// Errors produced by [`TextBuffer`] queries and [`TextModel`] edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A byte offset was past the end of the document.
    #[error("offset {offset} is out of range (document length {len})")]
    OffsetOutOfRange {
        /// Requested offset.
        offset: usize,
        /// Document length in bytes.
        len: usize,
    },
    /// A line index was past the last line.
    #[error("line {line} is out of range (line count {line_count})")]
    LineOutOfRange {
        /// Requested line.
        line: usize,
        /// Number of lines in the document.
        line_count: usize,
    },
    /// An edit range was reversed, out of bounds, or split a UTF-8 character.
    #[error("invalid edit range {start}..{end}")]
    InvalidEdit {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
    },
}

/// Read access to a live document plus its change notifications.
///
/// Offsets are UTF-8 byte offsets; positions use zero-based lines and byte columns.
pub trait TextBuffer: Send + Sync {
    /// Identity of the document.
    fn id(&self) -> DocumentId;

    /// Version counter, incremented by every content change.
    fn version(&self) -> u64;

    /// Current language id (e.g. `"rust"`).
    fn language_id(&self) -> String;

    /// Total byte length.
    fn len(&self) -> usize;

    /// Returns `true` if the document is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lines (an empty document has one line).
    fn line_count(&self) -> usize;

    /// Content of `line`, excluding its line break.
    fn line_content(&self, line: usize) -> Result<String, BufferError>;

    /// Convert a byte offset into a position.
    fn position_at(&self, offset: usize) -> Result<Position, BufferError>;

    /// Convert a position into a byte offset (columns clamp to the line end).
    fn offset_at(&self, position: Position) -> Result<usize, BufferError>;

    /// Text of a byte range, clamped to the document and widened to character boundaries.
    fn value_in_range(&self, range: Range<usize>) -> Result<String, BufferError>;

    /// Take an immutable point-in-time snapshot.
    fn create_snapshot(&self) -> TextSnapshot;

    /// Register a content change listener.
    fn on_did_change_content(&self, listener: ContentChangeListener) -> ListenerId;

    /// Register a language change listener.
    fn on_did_change_language(&self, listener: LanguageChangeListener) -> ListenerId;

    /// Remove a previously registered listener. Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

struct ModelState {
    line_index: LineIndex,
    language_id: String,
    version: u64,
    snapshot_chunk_size: usize,
}

type SharedContentListener = Arc<dyn Fn(&ContentChangedEvent) + Send + Sync>;
type SharedLanguageListener = Arc<dyn Fn(&LanguageChangedEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    content: Vec<(ListenerId, SharedContentListener)>,
    language: Vec<(ListenerId, SharedLanguageListener)>,
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }
}

/// A rope-backed, thread-safe live document.
///
/// # Example
///
/// ```rust
/// use editor_core::{TextBuffer, TextEdit, TextModel};
///
/// let model = TextModel::new("fn main() {}\n", "rust");
/// let event = model.apply_edits(&[TextEdit::insert(0, "// hi\n")]).unwrap();
///
/// assert_eq!(event.changes.len(), 1);
/// assert_eq!(model.line_content(0).unwrap(), "// hi");
/// assert_eq!(model.version(), 1);
/// ```
pub struct TextModel {
    id: DocumentId,
    state: RwLock<ModelState>,
    listeners: Mutex<Listeners>,
}

impl std::fmt::Debug for TextModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TextModel")
            .field("id", &self.id)
            .field("language_id", &state.language_id)
            .field("version", &state.version)
            .field("len", &state.line_index.byte_count())
            .finish()
    }
}

impl TextModel {
    /// Create a model with initial text and language id.
    pub fn new(text: &str, language_id: impl Into<String>) -> Self {
        Self {
            id: DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed)),
            state: RwLock::new(ModelState {
                line_index: LineIndex::from_text(text),
                language_id: language_id.into(),
                version: 0,
                snapshot_chunk_size: DEFAULT_SNAPSHOT_CHUNK_SIZE,
            }),
            listeners: Mutex::new(Listeners::default()),
        }
    }

    /// Set the chunk size used by snapshots created from now on.
    pub fn set_snapshot_chunk_size(&self, chunk_size: usize) {
        self.state.write().snapshot_chunk_size = chunk_size.max(1);
    }

    /// Get the complete text.
    pub fn get_value(&self) -> String {
        self.state.read().line_index.get_text()
    }

    /// Number of registered listeners (content + language).
    pub fn listener_count(&self) -> usize {
        let listeners = self.listeners.lock();
        listeners.content.len() + listeners.language.len()
    }

    /// Apply a batch of edits atomically and notify content listeners.
    ///
    /// Each edit's range refers to the document after the preceding edits of the batch. If any
    /// edit is invalid the document is left untouched. An empty batch is a no-op and produces no
    /// notification.
    pub fn apply_edits(&self, edits: &[TextEdit]) -> Result<ContentChangedEvent, BufferError> {
        let event = {
            let mut state = self.state.write();
            if edits.is_empty() {
                return Ok(ContentChangedEvent {
                    changes: Vec::new(),
                    version_id: state.version,
                });
            }

            let mut index = state.line_index.clone();
            let mut changes = Vec::with_capacity(edits.len());
            for edit in edits {
                let Range { start, end } = edit.range.clone();
                let invalid = BufferError::InvalidEdit { start, end };
                if start > end || !index.is_char_boundary(start) || !index.is_char_boundary(end)
                {
                    return Err(invalid);
                }
                let (Some(start_position), Some(end_position)) =
                    (index.offset_to_position(start), index.offset_to_position(end))
                else {
                    return Err(invalid);
                };

                index.replace(start..end, &edit.text);
                changes.push(ContentChange {
                    range_offset: start,
                    range_length: end - start,
                    text: edit.text.clone(),
                    range: TextRange::new(start_position, end_position),
                });
            }

            state.line_index = index;
            state.version += 1;
            ContentChangedEvent {
                changes,
                version_id: state.version,
            }
        };

        self.emit_content(&event);
        Ok(event)
    }

    /// Insert `text` at `offset`.
    pub fn insert(&self, offset: usize, text: &str) -> Result<ContentChangedEvent, BufferError> {
        self.apply_edits(&[TextEdit::insert(offset, text)])
    }

    /// Delete a byte range.
    pub fn delete(&self, range: Range<usize>) -> Result<ContentChangedEvent, BufferError> {
        self.apply_edits(&[TextEdit::delete(range)])
    }

    /// Replace a byte range.
    pub fn replace(
        &self,
        range: Range<usize>,
        text: &str,
    ) -> Result<ContentChangedEvent, BufferError> {
        self.apply_edits(&[TextEdit::replace(range, text)])
    }

    /// Replace the whole content.
    pub fn set_value(&self, text: &str) -> Result<ContentChangedEvent, BufferError> {
        let len = self.len();
        self.apply_edits(&[TextEdit::replace(0..len, text)])
    }

    /// Change the language id. Returns `false` (and fires nothing) if it is unchanged.
    pub fn set_language(&self, language_id: impl Into<String>) -> bool {
        let new_language = language_id.into();
        let event = {
            let mut state = self.state.write();
            if state.language_id == new_language {
                return false;
            }
            let old_language = std::mem::replace(&mut state.language_id, new_language.clone());
            LanguageChangedEvent {
                old_language,
                new_language,
            }
        };

        let listeners: Vec<SharedLanguageListener> = self
            .listeners
            .lock()
            .language
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
        true
    }

    fn emit_content(&self, event: &ContentChangedEvent) {
        // Clone the list so listeners may (un)register listeners while being notified.
        let listeners: Vec<SharedContentListener> = self
            .listeners
            .lock()
            .content
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl TextBuffer for TextModel {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn version(&self) -> u64 {
        self.state.read().version
    }

    fn language_id(&self) -> String {
        self.state.read().language_id.clone()
    }

    fn len(&self) -> usize {
        self.state.read().line_index.byte_count()
    }

    fn line_count(&self) -> usize {
        self.state.read().line_index.line_count()
    }

    fn line_content(&self, line: usize) -> Result<String, BufferError> {
        let state = self.state.read();
        state
            .line_index
            .line_text(line)
            .ok_or(BufferError::LineOutOfRange {
                line,
                line_count: state.line_index.line_count(),
            })
    }

    fn position_at(&self, offset: usize) -> Result<Position, BufferError> {
        let state = self.state.read();
        state
            .line_index
            .offset_to_position(offset)
            .ok_or(BufferError::OffsetOutOfRange {
                offset,
                len: state.line_index.byte_count(),
            })
    }

    fn offset_at(&self, position: Position) -> Result<usize, BufferError> {
        let state = self.state.read();
        state
            .line_index
            .position_to_offset(position)
            .ok_or(BufferError::LineOutOfRange {
                line: position.line,
                line_count: state.line_index.line_count(),
            })
    }

    fn value_in_range(&self, range: Range<usize>) -> Result<String, BufferError> {
        let state = self.state.read();
        let len = state.line_index.byte_count();
        if range.start > len {
            return Err(BufferError::OffsetOutOfRange {
                offset: range.start,
                len,
            });
        }
        Ok(state.line_index.slice(range))
    }

    fn create_snapshot(&self) -> TextSnapshot {
        let state = self.state.read();
        TextSnapshot::new(state.line_index.rope().clone(), state.version)
            .with_chunk_size(state.snapshot_chunk_size)
    }

    fn on_did_change_content(&self, listener: ContentChangeListener) -> ListenerId {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id();
        listeners.content.push((id, Arc::from(listener)));
        id
    }

    fn on_did_change_language(&self, listener: LanguageChangeListener) -> ListenerId {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id();
        listeners.language.push((id, Arc::from(listener)));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.content.len() + listeners.language.len();
        listeners.content.retain(|(listener_id, _)| *listener_id != id);
        listeners.language.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.content.len() + listeners.language.len()
    }
}
