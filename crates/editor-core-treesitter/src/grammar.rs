//! Grammar resolution and caching.
//!
//! Resolving a language id goes through four steps:
//! 1. look the id up in the [`GrammarRegistry`]
//! 2. locate the compiled artifact under the grammar root
//! 3. read it through a [`GrammarFileReader`]
//! 4. turn the bytes into a [`Language`] with a [`GrammarLoader`]
//!
//! Successful loads are cached for the lifetime of the [`GrammarCache`].

use crate::config::TreeSitterParserConfig;
use crate::error::GrammarError;
use async_trait::async_trait;
use editor_core_lang::{GrammarDescriptor, GrammarRegistry};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tree_sitter::Language;

/// A loaded grammar. Cheap to clone; clones share the same underlying [`Language`].
#[derive(Clone)]
pub struct GrammarHandle {
    inner: Arc<GrammarInner>,
}

struct GrammarInner {
    language_id: String,
    descriptor: GrammarDescriptor,
    language: Language,
}

impl GrammarHandle {
    /// Wrap a loaded language.
    pub fn new(
        language_id: impl Into<String>,
        descriptor: GrammarDescriptor,
        language: Language,
    ) -> Self {
        Self {
            inner: Arc::new(GrammarInner {
                language_id: language_id.into(),
                descriptor,
                language,
            }),
        }
    }

    /// Language id this grammar was resolved for.
    pub fn language_id(&self) -> &str {
        &self.inner.language_id
    }

    /// Grammar name.
    pub fn name(&self) -> &str {
        &self.inner.descriptor.name
    }

    /// The tree-sitter language.
    pub fn language(&self) -> &Language {
        &self.inner.language
    }
}

impl PartialEq for GrammarHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for GrammarHandle {}

impl fmt::Debug for GrammarHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarHandle")
            .field("language_id", &self.inner.language_id)
            .field("name", &self.inner.descriptor.name)
            .finish_non_exhaustive()
    }
}

/// Reads compiled grammar artifacts.
#[async_trait]
pub trait GrammarFileReader: Send + Sync {
    /// Read the whole file at `path`.
    async fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads artifacts from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGrammarReader;

#[async_trait]
impl GrammarFileReader for FsGrammarReader {
    async fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// In-memory artifact store, for hosts that ship grammars inside the binary and for tests.
#[derive(Debug, Default)]
pub struct MemoryGrammarReader {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryGrammarReader {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryGrammarReader::insert`].
    pub fn with_file(self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Add (or replace) a file.
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.write().insert(path.into(), bytes.into());
    }

    /// Number of `read_file` calls served so far, including misses.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GrammarFileReader for MemoryGrammarReader {
    async fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.files.read().get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// Turns artifact bytes into a tree-sitter [`Language`].
pub trait GrammarLoader: Send + Sync {
    /// Load the grammar described by `descriptor` from `artifact`.
    fn load(&self, descriptor: &GrammarDescriptor, artifact: &[u8])
    -> Result<Language, GrammarError>;
}

/// Loader for grammars compiled into the host binary.
///
/// Languages are looked up by grammar name; the artifact only has to exist, its bytes are not
/// interpreted.
#[derive(Default)]
pub struct BundledGrammarLoader {
    languages: HashMap<String, Language>,
}

impl BundledGrammarLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language under a grammar name.
    pub fn with_language(mut self, grammar: impl Into<String>, language: Language) -> Self {
        self.languages.insert(grammar.into(), language);
        self
    }
}

impl fmt::Debug for BundledGrammarLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("BundledGrammarLoader")
            .field("languages", &names)
            .finish()
    }
}

impl GrammarLoader for BundledGrammarLoader {
    fn load(
        &self,
        descriptor: &GrammarDescriptor,
        _artifact: &[u8],
    ) -> Result<Language, GrammarError> {
        self.languages
            .get(&descriptor.name)
            .cloned()
            .ok_or_else(|| GrammarError::Load {
                name: descriptor.name.clone(),
                message: "no bundled language with this name".to_string(),
            })
    }
}

/// Resolves language ids to grammars and keeps every successful load.
pub struct GrammarCache {
    config: TreeSitterParserConfig,
    reader: Arc<dyn GrammarFileReader>,
    loader: Arc<dyn GrammarLoader>,
    languages: RwLock<HashMap<String, GrammarHandle>>,
}

impl GrammarCache {
    /// Create a cache over the config's registry and grammar root.
    pub fn new(
        config: &TreeSitterParserConfig,
        reader: Arc<dyn GrammarFileReader>,
        loader: Arc<dyn GrammarLoader>,
    ) -> Self {
        Self {
            config: config.clone(),
            reader,
            loader,
            languages: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this cache resolves against.
    pub fn registry(&self) -> &GrammarRegistry {
        &self.config.registry
    }

    /// Directory of a language's grammar, if the language is registered.
    pub fn language_location(&self, language_id: &str) -> Option<PathBuf> {
        self.config.language_location(language_id)
    }

    /// Path of a language's compiled artifact, if the language is registered.
    pub fn artifact_path(&self, language_id: &str) -> Option<PathBuf> {
        self.config.artifact_path(language_id)
    }

    /// The cached grammar for a language, without fetching.
    pub fn cached(&self, language_id: &str) -> Option<GrammarHandle> {
        self.languages.read().get(language_id).cloned()
    }

    /// Number of cached grammars.
    pub fn cached_count(&self) -> usize {
        self.languages.read().len()
    }

    /// Resolve a language id to a grammar, fetching and loading it on first use.
    ///
    /// Returns `Ok(None)` for languages missing from the registry. Failed fetches are not
    /// cached; the next call tries again.
    pub async fn ensure_language(
        &self,
        language_id: &str,
    ) -> Result<Option<GrammarHandle>, GrammarError> {
        if let Some(handle) = self.cached(language_id) {
            return Ok(Some(handle));
        }

        let Some(descriptor) = self.registry().get(language_id).cloned() else {
            return Ok(None);
        };
        let Some(path) = self.artifact_path(language_id) else {
            return Ok(None);
        };

        tracing::debug!(language_id, path = %path.display(), "fetching grammar");
        let artifact = self
            .reader
            .read_file(&path)
            .await
            .map_err(|source| GrammarError::Io {
                path: path.clone(),
                source,
            })?;
        let language = self.loader.load(&descriptor, &artifact)?;

        let mut languages = self.languages.write();
        // A concurrent fetch may have inserted first.
        let handle = languages
            .entry(language_id.to_string())
            .or_insert_with(|| GrammarHandle::new(language_id, descriptor, language))
            .clone();
        Ok(Some(handle))
    }
}

impl fmt::Debug for GrammarCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarCache")
            .field("registry", &self.config.registry)
            .field("grammar_root", &self.config.grammar_root)
            .field("cached", &self.cached_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(reader: Arc<MemoryGrammarReader>) -> GrammarCache {
        let registry = GrammarRegistry::new().with_grammar("rust", "tree-sitter-rust");
        let config = TreeSitterParserConfig::new(registry).with_grammar_root("/grammars");
        let loader = BundledGrammarLoader::new()
            .with_language("tree-sitter-rust", tree_sitter_rust::LANGUAGE.into());
        GrammarCache::new(&config, reader, Arc::new(loader))
    }

    #[tokio::test]
    async fn test_unregistered_language_is_absent() {
        let reader = Arc::new(MemoryGrammarReader::new());
        let cache = cache(reader.clone());

        let grammar = cache.ensure_language("cobol").await.unwrap();
        assert!(grammar.is_none());
        assert_eq!(reader.read_count(), 0);
    }

    #[tokio::test]
    async fn test_loads_once_and_caches() {
        let reader = Arc::new(
            MemoryGrammarReader::new()
                .with_file("/grammars/tree-sitter-rust/tree-sitter-rust.wasm", b"\0asm".to_vec()),
        );
        let cache = cache(reader.clone());

        let first = cache.ensure_language("rust").await.unwrap().unwrap();
        let second = cache.ensure_language("rust").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name(), "tree-sitter-rust");
        assert_eq!(first.language_id(), "rust");
        assert_eq!(reader.read_count(), 1);
        assert_eq!(cache.cached_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_an_io_error_and_not_cached() {
        let reader = Arc::new(MemoryGrammarReader::new());
        let cache = cache(reader.clone());

        let err = cache.ensure_language("rust").await.unwrap_err();
        assert!(matches!(err, GrammarError::Io { .. }));
        assert!(cache.cached("rust").is_none());

        reader.insert(
            "/grammars/tree-sitter-rust/tree-sitter-rust.wasm",
            b"\0asm".to_vec(),
        );
        assert!(cache.ensure_language("rust").await.unwrap().is_some());
        assert_eq!(reader.read_count(), 2);
    }

    #[test]
    fn test_bundled_loader_rejects_unknown_names() {
        let loader = BundledGrammarLoader::new();
        let err = loader
            .load(&GrammarDescriptor::new("tree-sitter-go"), &[])
            .unwrap_err();
        assert!(matches!(err, GrammarError::Load { ref name, .. } if name == "tree-sitter-go"));
    }
}
