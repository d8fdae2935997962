//! Bracket classification of raw tokens.

use crate::token::{BracketKind, RawToken, Token};
use editor_core::TextRange;
use editor_core_lang::BracketConfig;
use regex::Regex;
use std::collections::VecDeque;

/// Returns `true` for token types whose text never contains structural brackets
/// (comments, strings and regex literals).
pub fn ignores_brackets(token_type: &str) -> bool {
    token_type
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| matches!(word, "comment" | "string" | "regex"))
}

/// Splits raw tokens around the brackets of one language and classifies them.
///
/// Brackets found inside a token become tokens of their own, typed
/// `"{language};{open};{close}"`; the text around them keeps the raw token's type. Tokens that
/// [ignore brackets](ignores_brackets) and tokens spanning several lines pass through whole.
pub struct TokenScanner<I> {
    raw: I,
    brackets: BracketConfig,
    bracket_regex: Option<Regex>,
    pending: VecDeque<Token>,
}

impl<I> TokenScanner<I>
where
    I: Iterator<Item = RawToken>,
{
    /// Classify the tokens of `raw` using `brackets`.
    pub fn new(raw: I, brackets: &BracketConfig) -> Self {
        Self {
            raw,
            brackets: brackets.clone(),
            bracket_regex: bracket_regex(brackets),
            pending: VecDeque::new(),
        }
    }

    fn split(&mut self, raw: RawToken) {
        let single_line = raw.range.start.line == raw.range.end.line;
        let regex = match &self.bracket_regex {
            Some(regex) if single_line && !ignores_brackets(&raw.token_type) => regex,
            _ => {
                if !raw.range.is_empty() {
                    self.pending
                        .push_back(Token::new(raw.range, raw.token_type, BracketKind::None));
                }
                return;
            }
        };

        let line = raw.range.start.line;
        let base = raw.range.start.column;
        let mut start = 0;
        for found in regex.find_iter(&raw.text) {
            let Some((pair, is_open)) = self.brackets.classify(found.as_str()) else {
                continue;
            };
            if start < found.start() {
                self.pending.push_back(Token::new(
                    TextRange::on_line(line, base + start, base + found.start()),
                    raw.token_type.as_str(),
                    BracketKind::None,
                ));
            }
            self.pending.push_back(Token::new(
                TextRange::on_line(line, base + found.start(), base + found.end()),
                format!("{};{};{}", self.brackets.language_id, pair.open, pair.close),
                if is_open {
                    BracketKind::Open
                } else {
                    BracketKind::Close
                },
            ));
            start = found.end();
        }

        if start < raw.text.len() {
            self.pending.push_back(Token::new(
                TextRange::on_line(line, base + start, base + raw.text.len()),
                raw.token_type,
                BracketKind::None,
            ));
        }
    }
}

impl<I> Iterator for TokenScanner<I>
where
    I: Iterator<Item = RawToken>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let raw = self.raw.next()?;
            self.split(raw);
        }
    }
}

/// One case-insensitive alternation of every bracket text, longest first. Word-like brackets
/// (`begin`/`end`) only match as whole words.
fn bracket_regex(brackets: &BracketConfig) -> Option<Regex> {
    if brackets.is_empty() {
        return None;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let alternatives: Vec<String> = brackets
        .bracket_texts()
        .into_iter()
        .map(|text| {
            let mut pattern = regex::escape(text);
            if text.starts_with(is_word) {
                pattern.insert_str(0, r"\b");
            }
            if text.ends_with(is_word) {
                pattern.push_str(r"\b");
            }
            pattern
        })
        .collect();

    match Regex::new(&format!("(?i){}", alternatives.join("|"))) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(
                language_id = %brackets.language_id,
                error = %err,
                "invalid bracket pattern; brackets disabled"
            );
            None
        }
    }
}
