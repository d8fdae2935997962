//! Per-document parse tree lifecycle.

use crate::config::TreeSitterParserConfig;
use crate::error::GrammarError;
use crate::grammar::{GrammarCache, GrammarFileReader, GrammarHandle, GrammarLoader};
use crate::reader::{ContentReader, SnapshotState};
use crate::telemetry::{ParseKind, ParseTimeEvent, TelemetrySink, TracingTelemetry};
use crate::translate::input_edit_for_change;
use editor_core::{
    ContentChangedEvent, DocumentId, LanguageChangedEvent, ListenerId, TextBuffer,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::{OnceCell, watch};
use tree_sitter::{Parser, Tree};

/// Lifecycle state of a document as seen by the parser service.
///
/// Unregistering a document (or disposing the service) releases everything the service held
/// for it, so a disposed document reports [`DocumentState::Unregistered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Not registered (never registered, or unregistered or disposed since).
    Unregistered,
    /// Registered but without a tree: the language has no grammar, or its grammar is still
    /// being resolved or failed to load.
    AwaitingLanguage,
    /// A grammar is assigned and the tree covers the buffer.
    Parsed,
}

/// Keeps one incrementally updated tree-sitter tree per registered document.
///
/// - Registration resolves the document's grammar and runs a full parse from a buffer snapshot.
/// - Content changes are applied synchronously from the buffer's change listener: the tree is
///   edited with every change of the event, in order, then re-parsed incrementally.
/// - Language changes resolve the new grammar asynchronously on the tokio runtime that
///   registered the document. Only the most recent resolution for a document is applied.
///
/// Grammar failures are logged and leave the affected document without a tree; they never
/// surface to the caller.
///
/// ```rust,no_run
/// use editor_core::{TextBuffer, TextModel};
/// use editor_core_lang::GrammarRegistry;
/// use editor_core_treesitter::{
///     BundledGrammarLoader, FsGrammarReader, TreeSitterParserConfig, TreeSitterParserService,
/// };
/// use std::sync::Arc;
///
/// # async fn run() {
/// let registry = GrammarRegistry::new().with_grammar("rust", "tree-sitter-rust");
/// let config = TreeSitterParserConfig::new(registry).with_grammar_root("/usr/share/grammars");
/// let loader = BundledGrammarLoader::new(); // register compiled-in languages here
/// let service =
///     TreeSitterParserService::new(config, Arc::new(FsGrammarReader), Arc::new(loader));
///
/// let model = Arc::new(TextModel::new("fn main() {}\n", "rust"));
/// service.register_document(model.clone()).await;
/// let tree = service.get_tree(model.id());
/// # }
/// ```
pub struct TreeSitterParserService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    grammars: GrammarCache,
    preload: Vec<String>,
    telemetry: Arc<dyn TelemetrySink>,
    documents: Mutex<HashMap<DocumentId, Arc<DocumentEntry>>>,
    initialized: OnceCell<()>,
    pending: Arc<watch::Sender<usize>>,
}

struct DocumentEntry {
    buffer: Arc<dyn TextBuffer>,
    state: Mutex<TreeEntry>,
}

struct TreeEntry {
    parser: Parser,
    tree: Option<Tree>,
    /// Buffer version the tree reflects.
    tree_version: u64,
    grammar: Option<GrammarHandle>,
    snapshot: SnapshotState,
    /// Bumped by every language request; a resolution only applies if the epoch is unchanged.
    epoch: u64,
    listeners: Vec<ListenerId>,
    disposed: bool,
}

impl TreeEntry {
    fn new() -> Self {
        Self {
            parser: Parser::new(),
            tree: None,
            tree_version: 0,
            grammar: None,
            snapshot: SnapshotState::new(),
            epoch: 0,
            listeners: Vec::new(),
            disposed: false,
        }
    }

    fn set_tree(&mut self, tree: Option<Tree>, version: u64) {
        self.tree = tree;
        self.tree_version = version;
        self.snapshot.reset();
    }

    fn assign_grammar(&mut self, grammar: GrammarHandle) -> Result<(), GrammarError> {
        self.parser
            .set_language(grammar.language())
            .map_err(|err| GrammarError::Incompatible {
                name: grammar.name().to_string(),
                message: err.to_string(),
            })?;
        self.grammar = Some(grammar);
        Ok(())
    }

    fn unassign_grammar(&mut self) {
        self.parser = Parser::new();
        self.grammar = None;
        self.set_tree(None, 0);
    }

    fn dispose(&mut self) {
        self.unassign_grammar();
        self.epoch += 1;
        self.disposed = true;
    }
}

/// Counts an in-flight registration or language resolution until dropped.
struct PendingGuard {
    pending: Arc<watch::Sender<usize>>,
}

impl PendingGuard {
    fn new(pending: &Arc<watch::Sender<usize>>) -> Self {
        pending.send_modify(|count| *count += 1);
        Self {
            pending: Arc::clone(pending),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

impl TreeSitterParserService {
    /// Create a service that reports parse times through `tracing`.
    pub fn new(
        config: TreeSitterParserConfig,
        reader: Arc<dyn GrammarFileReader>,
        loader: Arc<dyn GrammarLoader>,
    ) -> Self {
        Self::with_telemetry(config, reader, loader, Arc::new(TracingTelemetry))
    }

    /// Create a service with a custom telemetry sink.
    pub fn with_telemetry(
        config: TreeSitterParserConfig,
        reader: Arc<dyn GrammarFileReader>,
        loader: Arc<dyn GrammarLoader>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let (pending, _) = watch::channel(0);
        Self {
            inner: Arc::new(ServiceInner {
                grammars: GrammarCache::new(&config, reader, loader),
                preload: config.preload_languages,
                telemetry,
                documents: Mutex::new(HashMap::new()),
                initialized: OnceCell::new(),
                pending: Arc::new(pending),
            }),
        }
    }

    /// Preload the configured grammars. Runs once; later calls wait for the first one.
    pub async fn initialize(&self) {
        self.inner.initialize().await;
    }

    /// The grammar cache backing this service.
    pub fn grammars(&self) -> &GrammarCache {
        &self.inner.grammars
    }

    /// Start tracking a document and parse it if its language has a grammar.
    ///
    /// Waits for [`initialize`](Self::initialize) first. Registering an already registered
    /// document is a no-op.
    pub async fn register_document(&self, buffer: Arc<dyn TextBuffer>) {
        let _pending = PendingGuard::new(&self.inner.pending);
        self.inner.initialize().await;

        let document = buffer.id();
        let entry = {
            let mut documents = self.inner.documents.lock();
            if documents.contains_key(&document) {
                tracing::debug!(document = document.get(), "document already registered");
                return;
            }
            let entry = Arc::new(DocumentEntry {
                buffer,
                state: Mutex::new(TreeEntry::new()),
            });
            documents.insert(document, Arc::clone(&entry));
            entry
        };

        ServiceInner::install_listeners(&self.inner, &entry);
        let Some(epoch) = entry.begin_language_request() else {
            return;
        };
        let language_id = entry.buffer.language_id();
        self.inner.update_language(&entry, &language_id, epoch).await;
    }

    /// Stop tracking a document: remove its listeners and drop its tree.
    ///
    /// In-flight work for the document is discarded when it completes. Returns `false` if the
    /// document was not registered.
    pub fn unregister_document(&self, document: DocumentId) -> bool {
        let Some(entry) = self.inner.documents.lock().remove(&document) else {
            return false;
        };
        entry.dispose();
        tracing::debug!(document = document.get(), "document unregistered");
        true
    }

    /// Unregister every document.
    pub fn dispose(&self) {
        let entries: Vec<Arc<DocumentEntry>> = self
            .inner
            .documents
            .lock()
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        for entry in entries {
            entry.dispose();
        }
    }

    /// The current tree of a document (a cheap copy sharing structure with the service's tree).
    pub fn get_tree(&self, document: DocumentId) -> Option<Tree> {
        let entry = self.inner.entry(document)?;
        let state = entry.state.lock();
        state.tree.clone()
    }

    /// The grammar currently assigned to a document.
    pub fn get_language(&self, document: DocumentId) -> Option<GrammarHandle> {
        let entry = self.inner.entry(document)?;
        let state = entry.state.lock();
        state.grammar.clone()
    }

    /// Buffer version the document's tree reflects.
    pub fn tree_version(&self, document: DocumentId) -> Option<u64> {
        let entry = self.inner.entry(document)?;
        let state = entry.state.lock();
        state.tree.as_ref().map(|_| state.tree_version)
    }

    /// Lifecycle state of a document.
    pub fn document_state(&self, document: DocumentId) -> DocumentState {
        let Some(entry) = self.inner.entry(document) else {
            return DocumentState::Unregistered;
        };
        let state = entry.state.lock();
        if state.tree.is_some() {
            DocumentState::Parsed
        } else {
            DocumentState::AwaitingLanguage
        }
    }

    /// Number of registered documents.
    pub fn document_count(&self) -> usize {
        self.inner.documents.lock().len()
    }

    /// Wait until no registration or language resolution is in flight.
    pub async fn when_idle(&self) {
        let mut pending = self.inner.pending.subscribe();
        let _ = pending.wait_for(|count| *count == 0).await;
    }
}

impl Drop for TreeSitterParserService {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for TreeSitterParserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterParserService")
            .field("grammars", &self.inner.grammars)
            .field("documents", &self.document_count())
            .finish_non_exhaustive()
    }
}

impl DocumentEntry {
    /// Bump the language epoch, superseding every earlier request. `None` once disposed.
    fn begin_language_request(&self) -> Option<u64> {
        let mut state = self.state.lock();
        if state.disposed {
            return None;
        }
        state.epoch += 1;
        Some(state.epoch)
    }

    fn dispose(&self) {
        let mut state = self.state.lock();
        for listener in state.listeners.drain(..) {
            self.buffer.remove_listener(listener);
        }
        state.dispose();
    }
}

impl ServiceInner {
    async fn initialize(&self) {
        self.initialized
            .get_or_init(|| async {
                for language_id in &self.preload {
                    match self.grammars.ensure_language(language_id).await {
                        Ok(Some(grammar)) => {
                            tracing::debug!(language_id, grammar = grammar.name(), "preloaded");
                        }
                        Ok(None) => {
                            tracing::debug!(language_id, "no grammar registered; not preloading");
                        }
                        Err(err) => {
                            tracing::warn!(language_id, error = %err, "failed to preload grammar");
                        }
                    }
                }
            })
            .await;
    }

    fn entry(&self, document: DocumentId) -> Option<Arc<DocumentEntry>> {
        self.documents.lock().get(&document).cloned()
    }

    fn install_listeners(this: &Arc<Self>, entry: &Arc<DocumentEntry>) {
        let mut state = entry.state.lock();
        if state.disposed {
            return;
        }
        let document = entry.buffer.id();

        let service: Weak<Self> = Arc::downgrade(this);
        let content = entry
            .buffer
            .on_did_change_content(Box::new(move |event: &ContentChangedEvent| {
                if let Some(service) = service.upgrade() {
                    service.handle_content_change(document, event);
                }
            }));

        let service: Weak<Self> = Arc::downgrade(this);
        let runtime = tokio::runtime::Handle::try_current().ok();
        let language = entry
            .buffer
            .on_did_change_language(Box::new(move |event: &LanguageChangedEvent| {
                let Some(service) = service.upgrade() else {
                    return;
                };
                let Some(runtime) = runtime.as_ref() else {
                    tracing::warn!(
                        document = document.get(),
                        "no tokio runtime; ignoring language change"
                    );
                    return;
                };
                let Some(entry) = service.entry(document) else {
                    return;
                };
                // Requests are ordered here, as the events fire, not when their tasks run.
                let Some(epoch) = entry.begin_language_request() else {
                    return;
                };
                let pending = PendingGuard::new(&service.pending);
                let language_id = event.new_language.clone();
                runtime.spawn(async move {
                    let _pending = pending;
                    service.update_language(&entry, &language_id, epoch).await;
                });
            }));

        state.listeners.extend([content, language]);
    }

    /// Resolve `language_id` and, if request `epoch` is still the latest one and the buffer
    /// still has that language, assign the grammar and run a full parse.
    async fn update_language(&self, entry: &DocumentEntry, language_id: &str, epoch: u64) {
        let document = entry.buffer.id().get();

        let grammar = match self.grammars.ensure_language(language_id).await {
            Ok(grammar) => grammar,
            Err(err) => {
                tracing::warn!(language_id, error = %err, "failed to load grammar");
                None
            }
        };

        let mut state = entry.state.lock();
        if state.disposed || state.epoch != epoch || entry.buffer.language_id() != language_id {
            tracing::debug!(document, language_id, "discarding stale grammar resolution");
            return;
        }

        let Some(grammar) = grammar else {
            tracing::debug!(document, language_id, "no grammar; dropping tree");
            state.unassign_grammar();
            return;
        };
        if let Err(err) = state.assign_grammar(grammar) {
            tracing::warn!(document, language_id, error = %err, "cannot use grammar");
            state.unassign_grammar();
            return;
        }
        self.full_parse(entry.buffer.as_ref(), &mut state);
    }

    fn handle_content_change(&self, document: DocumentId, event: &ContentChangedEvent) {
        let Some(entry) = self.entry(document) else {
            return;
        };
        let mut state = entry.state.lock();
        if state.disposed || state.grammar.is_none() || state.tree.is_none() {
            return;
        }
        if event.version_id <= state.tree_version {
            return;
        }

        let buffer = entry.buffer.as_ref();
        if event.version_id != state.tree_version + 1 || buffer.version() != event.version_id {
            tracing::debug!(
                document = document.get(),
                tree_version = state.tree_version,
                event_version = event.version_id,
                "tree out of step with buffer; reparsing from scratch"
            );
            self.full_parse(buffer, &mut state);
            return;
        }
        self.incremental_parse(buffer, &mut state, event);
    }

    fn full_parse(&self, buffer: &dyn TextBuffer, state: &mut TreeEntry) {
        let snapshot = buffer.create_snapshot();
        let version = snapshot.version_id();
        state.snapshot.begin(snapshot);

        let started = Instant::now();
        let tree = {
            let TreeEntry {
                parser, snapshot, ..
            } = &mut *state;
            let mut reader = ContentReader::with_snapshot(buffer, snapshot);
            parser.parse_with_options(&mut |offset, _| reader.read(offset), None, None)
        };
        self.report_parse_time(ParseKind::Full, buffer.language_id(), started.elapsed());

        state.set_tree(tree, version);
    }

    fn incremental_parse(
        &self,
        buffer: &dyn TextBuffer,
        state: &mut TreeEntry,
        event: &ContentChangedEvent,
    ) {
        if let Some(tree) = state.tree.as_mut() {
            for change in &event.changes {
                tree.edit(&input_edit_for_change(change));
            }
        }

        let started = Instant::now();
        let tree = {
            let TreeEntry { parser, tree, .. } = &mut *state;
            let mut reader = ContentReader::live(buffer);
            parser.parse_with_options(&mut |offset, _| reader.read(offset), tree.as_ref(), None)
        };
        self.report_parse_time(
            ParseKind::Incremental,
            buffer.language_id(),
            started.elapsed(),
        );

        state.set_tree(tree, event.version_id);
    }

    fn report_parse_time(&self, kind: ParseKind, language_id: String, elapsed: Duration) {
        let event = ParseTimeEvent::new(language_id, elapsed);
        tracing::info!("Tree parsing ({}) took {} ms", kind.as_str(), event.time_ms);
        self.telemetry.log(kind.event_name(), &event);
    }
}
