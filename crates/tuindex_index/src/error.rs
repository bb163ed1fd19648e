//! Error types for index, engine, provider, and database operations.

use std::path::PathBuf;

/// Errors surfaced by [`SourceIndex`](crate::SourceIndex).
///
/// Only [`IndexError::ProviderUnavailable`] ever reaches a caller. Parse and
/// reparse failures are logged where they occur and degrade to the next
/// coarser strategy; disposal failures are logged during teardown.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The engine produced no translation unit on a full parse.
    #[error("error parsing translation unit {}: {source}", path.display())]
    ParseFailure {
        /// The source file that failed to parse.
        path: PathBuf,
        /// The engine's report.
        source: EngineError,
    },

    /// An in-place reparse returned a nonzero status.
    #[error("error re-parsing translation unit {}: {source}", path.display())]
    ReparseFailure {
        /// The source file that failed to reparse.
        path: PathBuf,
        /// The engine's report.
        source: EngineError,
    },

    /// A compile-flag or overlay provider could not answer.
    #[error("{provider} unavailable: {source}")]
    ProviderUnavailable {
        /// Which collaborator failed.
        provider: &'static str,
        /// The provider's report.
        source: ProviderError,
    },

    /// The engine failed to release a unit or the index.
    #[error("error disposing {}: {source}", path.display())]
    DisposeFailure {
        /// The unit's source file, or the empty path for the index itself.
        path: PathBuf,
        /// The engine's report.
        source: EngineError,
    },
}

/// A failure reported by the parser engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("engine status {status}: {message}")]
pub struct EngineError {
    /// Engine-specific nonzero status code.
    pub status: i32,
    /// Human-readable description.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error with the given status.
    pub fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// A collaborator (compile-flag or overlay provider) could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Description of the failure.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading a compile-command database.
#[derive(Debug, thiserror::Error)]
pub enum CompileDbError {
    /// The database file could not be read.
    #[error("failed to read compile commands at {}: {source}", path.display())]
    Io {
        /// The database path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The database is not valid JSON of the expected shape.
    #[error("failed to parse compile commands: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// An entry has neither `arguments` nor `command`.
    #[error("compile command for {} has neither `arguments` nor `command`", file.display())]
    MissingCommand {
        /// The entry's source file.
        file: PathBuf,
    },

    /// An entry's `command` string could not be split into arguments.
    #[error("unbalanced quoting in compile command for {}", file.display())]
    InvalidCommand {
        /// The entry's source file.
        file: PathBuf,
    },
}
