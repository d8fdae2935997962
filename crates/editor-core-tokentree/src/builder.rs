//! Recursive-descent token tree builder.
//!
//! Grammar:
//!
//! ```text
//! program = { line | any }
//! line    = { token | block }      (every element starts on the line of the first one)
//! block   = open { line } close    (close.type == open.type)
//! ```
//!
//! A block whose closing bracket is missing or of another type degrades to a flat list of the
//! open bracket followed by the scanned elements.

use crate::scanner::TokenScanner;
use crate::token::{BracketKind, Token};
use crate::tokenizer::{LineTokenizer, ModelRawTokenScanner};
use crate::tree::{Built, TokenTree};
use editor_core::TextBuffer;
use editor_core_lang::BracketConfig;

/// Builds a [`TokenTree`] from classified tokens.
pub struct TokenTreeBuilder<I> {
    tokens: I,
    pushback: Option<Token>,
}

impl<I> TokenTreeBuilder<I>
where
    I: Iterator<Item = Token>,
{
    /// Create a builder over `tokens`.
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            pushback: None,
        }
    }

    /// Consume every token and build the tree.
    ///
    /// If the document reduces to a single node, that node is the root.
    pub fn build(mut self) -> TokenTree {
        let mut children = Vec::new();
        while let Some(node) = self.line().or_else(|| self.any()) {
            append(&mut children, node);
        }

        let root = if children.len() == 1 {
            children.pop().unwrap_or(Built::List(Vec::new()))
        } else {
            Built::List(children)
        };
        TokenTree::from_built(root)
    }

    /// Take the next token if `accept` approves it; otherwise push it back.
    fn accept(&mut self, accept: impl FnOnce(&Token) -> bool) -> Option<Token> {
        let token = self.pushback.take().or_else(|| self.tokens.next())?;
        if accept(&token) {
            Some(token)
        } else {
            self.pushback = Some(token);
            None
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.pushback.is_none() {
            self.pushback = self.tokens.next();
        }
        self.pushback.as_ref()
    }

    fn line(&mut self) -> Option<Built> {
        let line = self.peek()?.range.start.line;
        let mut children = Vec::new();

        while self
            .peek()
            .is_some_and(|token| token.range.start.line == line)
        {
            let Some(node) = self.token().or_else(|| self.block()) else {
                break;
            };
            append(&mut children, node);
        }

        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Built::List(children)),
        }
    }

    fn token(&mut self) -> Option<Built> {
        self.accept(|token| token.bracket == BracketKind::None)
            .map(|token| Built::Token(token.range))
    }

    fn block(&mut self) -> Option<Built> {
        let open = self.accept(|token| token.bracket == BracketKind::Open)?;

        let mut elements = Vec::new();
        while let Some(line) = self.line() {
            append(&mut elements, line);
        }

        let close = self.accept(|token| {
            token.bracket == BracketKind::Close && token.token_type == open.token_type
        });
        match close {
            Some(close) => Some(Built::Block {
                open: open.range,
                elements,
                close: close.range,
            }),
            None => {
                let mut list = vec![Built::Token(open.range)];
                list.extend(elements);
                Some(Built::List(list))
            }
        }
    }

    fn any(&mut self) -> Option<Built> {
        self.accept(|_| true).map(|token| Built::Token(token.range))
    }
}

/// Append `node` to a list, splicing in the children of nested lists.
fn append(children: &mut Vec<Built>, node: Built) {
    match node {
        Built::List(nested) => children.extend(nested),
        node => children.push(node),
    }
}

/// Build a token tree from classified tokens.
pub fn build<T>(tokens: T) -> TokenTree
where
    T: IntoIterator<Item = Token>,
{
    TokenTreeBuilder::new(tokens).build()
}

/// Tokenize `buffer` line by line, classify brackets and build its token tree.
///
/// If the buffer changes while it is being scanned, the tree covers only the tokens read
/// before the change.
pub fn build_from_buffer(
    buffer: &dyn TextBuffer,
    tokenizer: &dyn LineTokenizer,
    brackets: &BracketConfig,
) -> TokenTree {
    let raw = ModelRawTokenScanner::new(buffer, tokenizer);
    let tree = build(TokenScanner::new(raw, brackets));
    tracing::trace!(
        language_id = %brackets.language_id,
        nodes = tree.len(),
        "built token tree"
    );
    tree
}
