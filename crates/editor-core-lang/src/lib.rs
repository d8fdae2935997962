#![warn(missing_docs)]
//! `editor-core-lang` - data-driven language configuration helpers for `editor-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing system. It
//! provides small tables that hosts pass to the structural parsing crates:
//!
//! - [`GrammarRegistry`]: which compiled grammar serves which language id
//! - [`BracketConfig`]: which bracket pairs a language uses

mod brackets;
mod grammar;

pub use brackets::{BracketConfig, BracketPair};
pub use grammar::{GrammarDescriptor, GrammarRegistry};
