#![warn(missing_docs)]
//! `editor-core-treesitter` - Tree-sitter integration for `editor-core`.
//!
//! This crate keeps one incrementally updated syntax tree per open document:
//!
//! - grammars are resolved per language id through an explicit registry, fetched once and cached
//!   ([`GrammarCache`])
//! - a document's first parse reads a consistent buffer snapshot in chunks ([`SnapshotState`])
//! - later edits are translated to tree-sitter edits ([`input_edit_for_change`]) and re-parsed
//!   incrementally against the live buffer
//! - language changes are resolved asynchronously; only the latest request per document wins
//!
//! The entry point is [`TreeSitterParserService`].

mod config;
mod error;
mod grammar;
mod reader;
mod service;
mod telemetry;
mod translate;

pub use config::TreeSitterParserConfig;
pub use error::GrammarError;
pub use grammar::{
    BundledGrammarLoader, FsGrammarReader, GrammarCache, GrammarFileReader, GrammarHandle,
    GrammarLoader, MemoryGrammarReader,
};
pub use reader::{ContentReader, SnapshotChunk, SnapshotState};
pub use service::{DocumentState, TreeSitterParserService};
pub use telemetry::{ParseKind, ParseTimeEvent, TelemetrySink, TracingTelemetry};
pub use translate::{advance_point, input_edit_for_change, point_for, position_for, read_live};

pub use tree_sitter;
