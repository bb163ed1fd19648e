//! Incremental parse-result cache in front of a compiler front end.
//!
//! [`SourceIndex`] maps absolute source paths to live translation units owned
//! by a [`ParserEngine`]. Each request is answered by reusing the cached unit,
//! reparsing it in place, or rebuilding it from scratch, depending on whether
//! the file's modification time or its compile arguments changed. Headers,
//! which cannot be parsed alone, are resolved to a cached or freshly parsed
//! translation unit that includes them.
//!
//! Compile arguments come from a [`CompilationDatabase`] such as
//! [`CompileCommands`]; editor buffers reach the engine through an
//! [`OverlayProvider`] such as [`UnsavedFiles`].

#![warn(missing_docs)]

pub mod compile_db;
pub mod engine;
pub mod error;
pub mod provider;
pub mod source_index;
pub mod unit;
pub mod unsaved_files;

mod timer;

#[cfg(test)]
mod testing;

pub use compile_db::CompileCommands;
pub use engine::ParserEngine;
pub use error::{CompileDbError, EngineError, IndexError, ProviderError};
pub use provider::{CompilationDatabase, DiskFileSystem, FileSystem, NoOverlays, OverlayProvider};
pub use source_index::SourceIndex;
pub use unit::{StoredUnit, TranslationUnit};
pub use unsaved_files::UnsavedFiles;
