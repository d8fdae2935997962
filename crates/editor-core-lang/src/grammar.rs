use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Describes the compiled grammar serving one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDescriptor {
    /// Grammar name, e.g. `"tree-sitter-typescript"`. Also names the artifact on disk.
    pub name: String,
}

impl GrammarDescriptor {
    /// Create a descriptor for the given grammar name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An explicit `language id → grammar` table.
///
/// The table is passed to the parser service at construction time; supporting a new language
/// means supplying a larger table.
///
/// ```rust
/// use editor_core_lang::GrammarRegistry;
///
/// let registry = GrammarRegistry::from_json_str(
///     r#"{ "rust": { "name": "tree-sitter-rust" } }"#,
/// ).unwrap();
/// assert_eq!(registry.get("rust").unwrap().name, "tree-sitter-rust");
/// assert!(registry.get("python").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrammarRegistry {
    grammars: BTreeMap<String, GrammarDescriptor>,
}

impl GrammarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock table: HTML and TypeScript.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_grammar("html", "tree-sitter-html")
            .with_grammar("typescript", "tree-sitter-typescript")
    }

    /// Parse a registry from a JSON object of `{ "<language id>": { "name": "<grammar>" } }`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style [`GrammarRegistry::register`].
    pub fn with_grammar(
        mut self,
        language_id: impl Into<String>,
        grammar: impl Into<String>,
    ) -> Self {
        self.register(language_id, grammar);
        self
    }

    /// Register (or replace) the grammar for a language.
    pub fn register(&mut self, language_id: impl Into<String>, grammar: impl Into<String>) {
        self.grammars
            .insert(language_id.into(), GrammarDescriptor::new(grammar));
    }

    /// Look up the grammar for a language.
    pub fn get(&self, language_id: &str) -> Option<&GrammarDescriptor> {
        self.grammars.get(language_id)
    }

    /// Registered language ids, sorted.
    pub fn language_ids(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// Number of registered languages.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Returns `true` if no language is registered.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}
