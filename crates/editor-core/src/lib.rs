#![warn(missing_docs)]
//! Editor Core - headless text model for incremental consumers
//!
//! # Overview
//!
//! `editor-core` is the document layer that structural parsers observe. It does not render or
//! tokenize anything itself; it stores text, tracks versions and language ids, and tells its
//! listeners exactly what changed.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextBuffer trait (read API + listeners)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  TextModel (versions, language, events)     │  ← Live document
//! ├─────────────────────────────────────────────┤
//! │  TextSnapshot (chunked immutable reads)     │  ← Point-in-time view
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Coordinates
//!
//! - offsets are UTF-8 byte offsets
//! - positions are zero-based `(line, byte column)` pairs
//! - only `'\n'` ends a line; `"\r\n"` counts as a single break
//!
//! # Quick Start
//!
//! ```rust
//! use editor_core::{Position, TextBuffer, TextModel};
//!
//! let model = TextModel::new("let x = 1;\nlet y = 2;\n", "rust");
//! model.on_did_change_content(Box::new(|event| {
//!     println!("{} change(s), now at v{}", event.changes.len(), event.version_id);
//! }));
//!
//! model.insert(4, "mut ").unwrap();
//! assert_eq!(model.line_content(0).unwrap(), "let mut x = 1;");
//! assert_eq!(model.position_at(15).unwrap(), Position::new(1, 0));
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`model`] - live document, [`TextBuffer`] trait and listeners
//! - [`delta`] - structured change records
//! - [`snapshot`] - immutable chunked snapshots
//! - [`position`] - positions and ranges

pub mod delta;
pub mod line_ending;
pub mod line_index;
pub mod model;
pub mod position;
pub mod snapshot;

pub use delta::{ContentChange, ContentChangedEvent, LanguageChangedEvent, TextEdit};
pub use line_ending::LineEnding;
pub use line_index::LineIndex;
pub use model::{
    BufferError, ContentChangeListener, DocumentId, LanguageChangeListener, ListenerId,
    TextBuffer, TextModel,
};
pub use position::{Position, TextRange};
pub use snapshot::{DEFAULT_SNAPSHOT_CHUNK_SIZE, TextSnapshot};
