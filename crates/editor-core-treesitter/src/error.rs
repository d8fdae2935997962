use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving a grammar.
///
/// None of these are fatal: the parser service logs them and carries on without a parse tree
/// for the affected documents.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// Reading the compiled grammar artifact failed.
    #[error("failed to read grammar artifact {path}: {source}")]
    Io {
        /// Artifact location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be turned into a grammar.
    #[error("failed to load grammar '{name}': {message}")]
    Load {
        /// Grammar name.
        name: String,
        /// Loader message.
        message: String,
    },

    /// The grammar was loaded but the parser rejected it (ABI mismatch).
    #[error("grammar '{name}' is incompatible with this parser: {message}")]
    Incompatible {
        /// Grammar name.
        name: String,
        /// Parser message.
        message: String,
    },
}
