//! Content callbacks for the parser.
//!
//! A full parse reads from a [`TextSnapshot`] so it sees one consistent version of the buffer.
//! Pulled chunks are kept in a [`SnapshotState`] because the parser may re-request offsets it
//! has already passed. Incremental parses read the live buffer line by line.

use crate::translate::read_live;
use editor_core::{TextBuffer, TextSnapshot};

/// A chunk pulled from a snapshot, tagged with its absolute start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotChunk {
    /// Chunk text.
    pub text: String,
    /// Byte offset of the chunk's first byte.
    pub start_offset: usize,
}

impl SnapshotChunk {
    /// Exclusive end offset.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    fn bytes_from(&self, offset: usize) -> Vec<u8> {
        self.text.as_bytes()[offset - self.start_offset..].to_vec()
    }
}

/// The snapshot of an in-progress full parse and the chunks read from it so far.
///
/// Chunks are contiguous: the first starts at 0 and each next one starts where the previous one
/// ended, so their concatenation is a prefix of the snapshot text.
#[derive(Debug, Default)]
pub struct SnapshotState {
    snapshot: Option<TextSnapshot>,
    chunks: Vec<SnapshotChunk>,
}

impl SnapshotState {
    /// Create an inactive state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reading from `snapshot`, dropping chunks of any earlier snapshot.
    pub fn begin(&mut self, snapshot: TextSnapshot) {
        self.snapshot = Some(snapshot);
        self.chunks.clear();
    }

    /// Returns `true` while reads are served from a snapshot.
    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Version of the active snapshot.
    pub fn version_id(&self) -> Option<u64> {
        self.snapshot.as_ref().map(TextSnapshot::version_id)
    }

    /// Chunks pulled so far, in offset order.
    pub fn chunks(&self) -> &[SnapshotChunk] {
        &self.chunks
    }

    /// Forget the snapshot and its chunks.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.chunks.clear();
    }

    /// Content starting at `offset`.
    ///
    /// Served from a cached chunk when one covers `offset`; otherwise chunks are pulled until
    /// one does. Once the snapshot runs out it is released and an empty read (end of input) is
    /// returned; the chunks already pulled stay cached.
    pub fn read_at(&mut self, offset: usize) -> Vec<u8> {
        let index = self
            .chunks
            .partition_point(|chunk| chunk.end_offset() <= offset);
        if let Some(chunk) = self.chunks.get(index) {
            return chunk.bytes_from(offset);
        }

        loop {
            let Some(snapshot) = self.snapshot.as_mut() else {
                return Vec::new();
            };
            let Some(text) = snapshot.read() else {
                self.snapshot = None;
                return Vec::new();
            };

            let start_offset = self.chunks.last().map_or(0, SnapshotChunk::end_offset);
            let chunk = SnapshotChunk { text, start_offset };
            if offset < chunk.end_offset() {
                let bytes = chunk.bytes_from(offset);
                self.chunks.push(chunk);
                return bytes;
            }
            self.chunks.push(chunk);
        }
    }
}

/// Content callback state for one parse.
pub struct ContentReader<'a> {
    buffer: &'a dyn TextBuffer,
    snapshot: Option<&'a mut SnapshotState>,
}

impl<'a> ContentReader<'a> {
    /// Read the live buffer only.
    pub fn live(buffer: &'a dyn TextBuffer) -> Self {
        Self {
            buffer,
            snapshot: None,
        }
    }

    /// Read from `snapshot` while it is active, then from the live buffer.
    pub fn with_snapshot(buffer: &'a dyn TextBuffer, snapshot: &'a mut SnapshotState) -> Self {
        Self {
            buffer,
            snapshot: Some(snapshot),
        }
    }

    /// Content starting at `offset`. Never fails: a buffer error reads as end of input.
    pub fn read(&mut self, offset: usize) -> Vec<u8> {
        if let Some(snapshot) = self.snapshot.as_deref_mut()
            && snapshot.is_active()
        {
            return snapshot.read_at(offset);
        }

        match read_live(self.buffer, offset) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::trace!(offset, error = %err, "content read failed; ending input");
                Vec::new()
            }
        }
    }
}
