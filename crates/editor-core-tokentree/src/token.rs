//! Raw and bracket-classified tokens.

use editor_core::TextRange;

/// Bracket role of a classified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BracketKind {
    /// Not a bracket.
    #[default]
    None,
    /// Opening bracket.
    Open,
    /// Closing bracket.
    Close,
}

/// A token as produced by a tokenizer, before bracket classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Covered range. May span several lines (e.g. a block comment).
    pub range: TextRange,
    /// Covered text.
    pub text: String,
    /// Tokenizer-specific type, e.g. `"comment"` or `"string.quoted"`.
    pub token_type: String,
}

impl RawToken {
    /// A token covering `text` on `line`, starting at byte column `column`.
    pub fn on_line(
        line: usize,
        column: usize,
        text: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let end = column + text.len();
        Self {
            range: TextRange::on_line(line, column, end),
            text,
            token_type: token_type.into(),
        }
    }
}

/// A bracket-classified token, the input of the tree builder.
///
/// Bracket tokens carry a type of the form `"{language};{open};{close}"`, so an opening and a
/// closing bracket match when their types are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Covered range.
    pub range: TextRange,
    /// Token type.
    pub token_type: String,
    /// Bracket role.
    pub bracket: BracketKind,
}

impl Token {
    /// Create a token.
    pub fn new(range: TextRange, token_type: impl Into<String>, bracket: BracketKind) -> Self {
        Self {
            range,
            token_type: token_type.into(),
            bracket,
        }
    }
}
