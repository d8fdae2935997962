use serde::{Deserialize, Serialize};

/// An open/close bracket pair, e.g. `("{", "}")` or `("begin", "end")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPair {
    /// Opening text.
    pub open: String,
    /// Closing text.
    pub close: String,
}

/// Bracket pairs for a given language.
///
/// Bracket text is matched case-insensitively (stored lowercased), so keyword brackets such as
/// `BEGIN`/`end` pair up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BracketConfig {
    /// Language id the pairs belong to.
    pub language_id: String,
    /// Configured pairs.
    pub pairs: Vec<BracketPair>,
}

impl BracketConfig {
    /// Create a config from `(open, close)` pairs.
    pub fn new<I, O, C>(language_id: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, C)>,
        O: Into<String>,
        C: Into<String>,
    {
        Self {
            language_id: language_id.into(),
            pairs: pairs
                .into_iter()
                .map(|(open, close)| BracketPair {
                    open: open.into().to_lowercase(),
                    close: close.into().to_lowercase(),
                })
                .filter(|pair| !pair.open.is_empty() && !pair.close.is_empty())
                .collect(),
        }
    }

    /// `()`, `[]` and `{}`.
    pub fn c_like(language_id: impl Into<String>) -> Self {
        Self::new(language_id, [("(", ")"), ("[", "]"), ("{", "}")])
    }

    /// Returns `true` if no pairs are configured.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Find the pair `text` belongs to and whether it is the opening side.
    pub fn classify(&self, text: &str) -> Option<(&BracketPair, bool)> {
        let text = text.to_lowercase();
        self.pairs.iter().find_map(|pair| {
            if pair.open == text {
                Some((pair, true))
            } else if pair.close == text {
                Some((pair, false))
            } else {
                None
            }
        })
    }

    /// Every distinct bracket text, longest first (so longer brackets win when scanning).
    pub fn bracket_texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = self
            .pairs
            .iter()
            .flat_map(|pair| [pair.open.as_str(), pair.close.as_str()])
            .collect();
        texts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        texts.dedup();
        texts
    }
}
