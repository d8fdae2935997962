use editor_core_lang::GrammarRegistry;
use std::path::PathBuf;

/// Configuration for [`TreeSitterParserService`](crate::TreeSitterParserService).
#[derive(Debug, Clone)]
pub struct TreeSitterParserConfig {
    /// Language id → grammar table.
    pub registry: GrammarRegistry,
    /// Directory holding one sub-directory per grammar.
    pub grammar_root: PathBuf,
    /// File extension of compiled grammar artifacts.
    pub artifact_extension: String,
    /// Languages whose grammars are fetched by `initialize()`.
    pub preload_languages: Vec<String>,
}

impl TreeSitterParserConfig {
    /// Create a config for the given registry.
    ///
    /// By default:
    /// - `grammar_root` is `treeSitterLanguages`
    /// - `artifact_extension` is `wasm`
    /// - nothing is preloaded
    pub fn new(registry: GrammarRegistry) -> Self {
        Self {
            registry,
            grammar_root: PathBuf::from("treeSitterLanguages"),
            artifact_extension: "wasm".to_string(),
            preload_languages: Vec::new(),
        }
    }

    /// Set the grammar root directory.
    pub fn with_grammar_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.grammar_root = root.into();
        self
    }

    /// Set the artifact file extension (without the dot).
    pub fn with_artifact_extension(mut self, extension: impl Into<String>) -> Self {
        self.artifact_extension = extension.into();
        self
    }

    /// Fetch these languages' grammars during `initialize()`.
    pub fn with_preload<I, S>(mut self, language_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload_languages
            .extend(language_ids.into_iter().map(Into::into));
        self
    }

    /// Directory of a language's grammar (`{grammar_root}/{grammar name}`).
    pub fn language_location(&self, language_id: &str) -> Option<PathBuf> {
        let grammar = self.registry.get(language_id)?;
        Some(self.grammar_root.join(&grammar.name))
    }

    /// Compiled artifact of a language's grammar
    /// (`{grammar_root}/{grammar name}/{grammar name}.{extension}`).
    pub fn artifact_path(&self, language_id: &str) -> Option<PathBuf> {
        let grammar = self.registry.get(language_id)?;
        let file_name = format!("{}.{}", grammar.name, self.artifact_extension);
        Some(self.language_location(language_id)?.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_artifact_path_layout() {
        let config = TreeSitterParserConfig::new(GrammarRegistry::with_defaults())
            .with_grammar_root("/opt/grammars");

        assert_eq!(
            config.language_location("html").as_deref(),
            Some(Path::new("/opt/grammars/tree-sitter-html"))
        );
        assert_eq!(
            config.artifact_path("typescript").as_deref(),
            Some(Path::new(
                "/opt/grammars/tree-sitter-typescript/tree-sitter-typescript.wasm"
            ))
        );
        assert_eq!(config.artifact_path("cobol"), None);
    }

    #[test]
    fn test_preload_accumulates() {
        let config = TreeSitterParserConfig::new(GrammarRegistry::new())
            .with_preload(["rust"])
            .with_preload(vec!["json".to_string()]);
        assert_eq!(config.preload_languages, vec!["rust", "json"]);
    }
}
