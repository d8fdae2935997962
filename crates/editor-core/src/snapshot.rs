//! Immutable point-in-time text snapshots.
//!
//! A [`TextSnapshot`] shares structure with the model's rope, so taking one is O(1). Content is
//! pulled in chunks through [`TextSnapshot::read`] rather than materialized all at once.

use ropey::Rope;

/// Default chunk size (in bytes) for [`TextSnapshot::read`].
pub const DEFAULT_SNAPSHOT_CHUNK_SIZE: usize = 64 * 1024;

/// A pull-based reader over an immutable copy of a document.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    rope: Rope,
    cursor: usize,
    chunk_size: usize,
    version_id: u64,
}

impl TextSnapshot {
    pub(crate) fn new(rope: Rope, version_id: u64) -> Self {
        Self {
            rope,
            cursor: 0,
            chunk_size: DEFAULT_SNAPSHOT_CHUNK_SIZE,
            version_id,
        }
    }

    /// Build a snapshot over a standalone string (mostly useful for tests).
    pub fn from_text(text: &str) -> Self {
        Self::new(Rope::from_str(text), 0)
    }

    /// Set the maximum chunk size (in bytes) returned by [`TextSnapshot::read`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Model version this snapshot was taken at.
    pub fn version_id(&self) -> u64 {
        self.version_id
    }

    /// Total byte length of the snapshot.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns `true` if the snapshot holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Read the next chunk, or `None` once the snapshot is exhausted.
    ///
    /// Chunks never split a UTF-8 character. A chunk may exceed `chunk_size` only when a single
    /// character is wider than the configured size.
    pub fn read(&mut self) -> Option<String> {
        let len = self.rope.len_bytes();
        if self.cursor >= len {
            return None;
        }

        let start_char = self.rope.byte_to_char(self.cursor);
        let target = self.cursor.saturating_add(self.chunk_size).min(len);
        let mut end_char = self.rope.byte_to_char(target);
        if end_char <= start_char {
            end_char = start_char + 1;
        }

        let chunk = self.rope.slice(start_char..end_char).to_string();
        self.cursor = self.rope.char_to_byte(end_char);
        Some(chunk)
    }
}
