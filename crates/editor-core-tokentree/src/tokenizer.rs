//! Raw line tokenizers.

use crate::token::RawToken;
use editor_core::TextBuffer;
use regex::Regex;
use std::collections::VecDeque;

/// Token type given to non-whitespace text no rule matched.
pub const TEXT_TOKEN_TYPE: &str = "text";

/// Splits one line into raw tokens.
pub trait LineTokenizer {
    /// Tokenize `text`, the content of `line` (without its line break).
    ///
    /// Tokens must be in column order and must not overlap.
    fn tokenize_line(&self, line: usize, text: &str) -> Vec<RawToken>;
}

/// A single regex tokenizing rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    regex: Regex,
    token_type: String,
}

impl TokenRule {
    /// Create a rule producing tokens of `token_type`.
    pub fn new(pattern: &str, token_type: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            token_type: token_type.into(),
        })
    }

    /// Token type produced by this rule.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

/// A simple regex-based line tokenizer.
///
/// At each column the rule with the earliest match wins (ties go to the rule listed first).
/// Whitespace between matches is dropped; any other unmatched text becomes
/// [`TEXT_TOKEN_TYPE`] tokens. It is *not* intended to be a full lexer.
#[derive(Debug, Clone)]
pub struct RegexLineTokenizer {
    rules: Vec<TokenRule>,
}

impl RegexLineTokenizer {
    /// Create a tokenizer from rules, in priority order.
    pub fn new(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    /// A small default JSON tokenizer (strings, numbers, keywords, delimiters).
    pub fn json_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            TokenRule::new(r#""(?:\\.|[^"\\])*""#, "string")?,
            TokenRule::new(r#"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?"#, "number")?,
            TokenRule::new(r#"\b(?:true|false|null)\b"#, "keyword")?,
            TokenRule::new(r#"[{}\[\],:]"#, "delimiter")?,
        ]))
    }

    /// A default tokenizer for C-like languages (comments, strings, numbers, identifiers,
    /// punctuation).
    ///
    /// Block comments are only recognized when they end on the line they start on; an
    /// unterminated `/*` comments out the rest of its line.
    pub fn c_like_default() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            TokenRule::new(r#"//.*"#, "comment.line")?,
            TokenRule::new(r#"/\*(?:.*?\*/|.*)"#, "comment.block")?,
            TokenRule::new(r#""(?:\\.|[^"\\])*"?"#, "string.quoted.double")?,
            TokenRule::new(r#"'(?:\\.|[^'\\])'"#, "string.quoted.single")?,
            TokenRule::new(r#"\b\d+(?:\.\d+)?\b"#, "number")?,
            TokenRule::new(r#"[A-Za-z_][A-Za-z0-9_]*"#, "identifier")?,
            TokenRule::new(r#"[^\sA-Za-z0-9_]"#, "delimiter")?,
        ]))
    }
}

impl LineTokenizer for RegexLineTokenizer {
    fn tokenize_line(&self, line: usize, text: &str) -> Vec<RawToken> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let next = self
                .rules
                .iter()
                .filter_map(|rule| {
                    rule.regex
                        .find_at(text, pos)
                        .filter(|m| !m.is_empty())
                        .map(|m| (m, rule))
                })
                .min_by_key(|(m, _)| m.start());

            let Some((m, rule)) = next else {
                push_text_runs(&mut tokens, line, text, pos, text.len());
                break;
            };

            push_text_runs(&mut tokens, line, text, pos, m.start());
            tokens.push(RawToken::on_line(
                line,
                m.start(),
                m.as_str(),
                rule.token_type.as_str(),
            ));
            pos = m.end();
        }

        tokens
    }
}

/// Push every non-whitespace run of `text[start..end]` as a text token.
fn push_text_runs(tokens: &mut Vec<RawToken>, line: usize, text: &str, start: usize, end: usize) {
    let mut run_start = None;
    for (offset, ch) in text[start..end].char_indices() {
        let column = start + offset;
        match (ch.is_whitespace(), run_start) {
            (false, None) => run_start = Some(column),
            (true, Some(from)) => {
                tokens.push(RawToken::on_line(line, from, &text[from..column], TEXT_TOKEN_TYPE));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(from) = run_start {
        tokens.push(RawToken::on_line(line, from, &text[from..end], TEXT_TOKEN_TYPE));
    }
}

/// Raw tokens of a live buffer, line by line.
///
/// The scan is tied to the buffer version it started at: once the buffer changes, no further
/// tokens are produced.
pub struct ModelRawTokenScanner<'a> {
    buffer: &'a dyn TextBuffer,
    tokenizer: &'a dyn LineTokenizer,
    version: u64,
    line: usize,
    line_count: usize,
    pending: VecDeque<RawToken>,
}

impl<'a> ModelRawTokenScanner<'a> {
    /// Start scanning `buffer` from its first line.
    pub fn new(buffer: &'a dyn TextBuffer, tokenizer: &'a dyn LineTokenizer) -> Self {
        Self {
            buffer,
            tokenizer,
            version: buffer.version(),
            line: 0,
            line_count: buffer.line_count(),
            pending: VecDeque::new(),
        }
    }

    /// Buffer version the scan started at.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Iterator for ModelRawTokenScanner<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        if self.buffer.version() != self.version {
            tracing::debug!(
                started_at = self.version,
                now = self.buffer.version(),
                "buffer changed during token scan; stopping"
            );
            return None;
        }

        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.line >= self.line_count {
                return None;
            }

            let text = match self.buffer.line_content(self.line) {
                Ok(text) => text,
                Err(err) => {
                    tracing::trace!(line = self.line, error = %err, "line read failed; stopping");
                    return None;
                }
            };
            self.pending
                .extend(self.tokenizer.tokenize_line(self.line, &text));
            self.line += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::TextModel;
    use pretty_assertions::assert_eq;

    fn summarize(tokens: &[RawToken]) -> Vec<(usize, &str, &str)> {
        tokens
            .iter()
            .map(|t| (t.range.start.column, t.text.as_str(), t.token_type.as_str()))
            .collect()
    }

    #[test]
    fn test_json_tokens() {
        let tokenizer = RegexLineTokenizer::json_default().unwrap();
        let tokens = tokenizer.tokenize_line(0, r#"{ "key": "值", "n": -12 }"#);

        assert_eq!(
            summarize(&tokens),
            vec![
                (0, "{", "delimiter"),
                (2, "\"key\"", "string"),
                (7, ":", "delimiter"),
                (9, "\"值\"", "string"),
                (14, ",", "delimiter"),
                (16, "\"n\"", "string"),
                (19, ":", "delimiter"),
                (21, "-12", "number"),
                (25, "}", "delimiter"),
            ]
        );
    }

    #[test]
    fn test_unmatched_text_becomes_text_tokens() {
        let tokenizer = RegexLineTokenizer::json_default().unwrap();
        let tokens = tokenizer.tokenize_line(3, "  oops  what ");

        assert_eq!(
            summarize(&tokens),
            vec![(2, "oops", TEXT_TOKEN_TYPE), (8, "what", TEXT_TOKEN_TYPE)]
        );
        assert!(tokens.iter().all(|t| t.range.start.line == 3));
    }

    #[test]
    fn test_c_like_comments_swallow_brackets() {
        let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
        let tokens = tokenizer.tokenize_line(0, "f(a) // (x");

        assert_eq!(
            summarize(&tokens),
            vec![
                (0, "f", "identifier"),
                (1, "(", "delimiter"),
                (2, "a", "identifier"),
                (3, ")", "delimiter"),
                (5, "// (x", "comment.line"),
            ]
        );
    }

    #[test]
    fn test_custom_rules_first_listed_wins_ties() {
        let keyword = TokenRule::new(r"\b(?:begin|end)\b", "keyword").unwrap();
        assert_eq!(keyword.token_type(), "keyword");
        let tokenizer = RegexLineTokenizer::new(vec![
            keyword,
            TokenRule::new(r"[a-z]+", "identifier").unwrap(),
        ]);

        assert_eq!(
            summarize(&tokenizer.tokenize_line(0, "begin x end")),
            vec![(0, "begin", "keyword"), (6, "x", "identifier"), (8, "end", "keyword")]
        );
    }

    #[test]
    fn test_model_scanner_walks_every_line() {
        let model = TextModel::new("a\n\nb c\n", "plain");
        let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
        let tokens: Vec<RawToken> = ModelRawTokenScanner::new(&model, &tokenizer).collect();

        let lines: Vec<(usize, &str)> = tokens
            .iter()
            .map(|t| (t.range.start.line, t.text.as_str()))
            .collect();
        assert_eq!(lines, vec![(0, "a"), (2, "b"), (2, "c")]);
    }

    #[test]
    fn test_model_scanner_stops_when_buffer_changes() {
        let model = TextModel::new("a b\nc d\n", "plain");
        let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
        let mut scanner = ModelRawTokenScanner::new(&model, &tokenizer);

        assert_eq!(scanner.next().map(|t| t.text), Some("a".to_string()));
        model.insert(0, "x").unwrap();
        assert_eq!(scanner.next(), None);
    }
}
