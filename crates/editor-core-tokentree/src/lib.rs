#![warn(missing_docs)]
//! `editor-core-tokentree` - bracket token trees for `editor-core`.
//!
//! A lightweight structural view of a document that needs no grammar, only a line tokenizer and
//! the language's bracket pairs:
//!
//! ```text
//! TextBuffer ──► ModelRawTokenScanner ──► TokenScanner ──► TokenTreeBuilder ──► TokenTree
//!               (LineTokenizer, per line)  (BracketConfig)   (line / block / any)
//! ```
//!
//! The resulting [`TokenTree`] answers "which node is at this position" ([`TokenTree::find`])
//! and "what should smart selection expand to" ([`TokenTree::selection_ranges`]).
//!
//! ```rust
//! use editor_core::{Position, TextModel, TextRange};
//! use editor_core_lang::BracketConfig;
//! use editor_core_tokentree::{build_from_buffer, RegexLineTokenizer};
//!
//! let model = TextModel::new("f(a, [b])\n", "c");
//! let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
//! let tree = build_from_buffer(&model, &tokenizer, &BracketConfig::c_like("c"));
//!
//! // `b`, `[b]`, `a, [b]`, `(a, [b])`, then the whole line
//! let ranges = tree.selection_ranges(Position::new(0, 7));
//! assert_eq!(ranges.len(), 5);
//! assert_eq!(ranges[0], TextRange::on_line(0, 6, 7));
//! ```

mod builder;
mod scanner;
mod token;
mod tokenizer;
mod tree;

pub use builder::{TokenTreeBuilder, build, build_from_buffer};
pub use scanner::{TokenScanner, ignores_brackets};
pub use token::{BracketKind, RawToken, Token};
pub use tokenizer::{
    LineTokenizer, ModelRawTokenScanner, RegexLineTokenizer, TEXT_TOKEN_TYPE, TokenRule,
};
pub use tree::{Node, NodeId, TokenTree};
