//! The parser-engine seam.
//!
//! A [`ParserEngine`] turns a source file plus compile arguments into a live
//! translation unit and can refresh that unit in place. The engine owns a
//! process-wide index value from which every unit is created; units must be
//! disposed before the index is.

use std::path::Path;

use tuindex_common::{GlobalOptions, ParseOptions, ReparseOptions, UnsavedFile};

use crate::error::EngineError;

/// An opaque compiler front end driven by [`SourceIndex`](crate::SourceIndex).
pub trait ParserEngine {
    /// Global engine state from which units are created.
    type Index;

    /// A live parsed representation of one translation unit.
    type Unit;

    /// Creates the engine index.
    ///
    /// `display_diagnostics` asks the engine to print its own diagnostics as
    /// it parses.
    fn create_index(&mut self, display_diagnostics: bool) -> Self::Index;

    /// Releases the engine index. Every unit created from it must already be
    /// disposed.
    fn dispose_index(&mut self, index: Self::Index) -> Result<(), EngineError>;

    /// Returns the index's option bitmask.
    fn global_options(&self, index: &Self::Index) -> GlobalOptions;

    /// Replaces the index's option bitmask.
    fn set_global_options(&mut self, index: &mut Self::Index, options: GlobalOptions);

    /// Parses `path` from scratch.
    fn parse(
        &mut self,
        index: &Self::Index,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<Self::Unit, EngineError>;

    /// Re-parses an existing unit in place with its original arguments.
    ///
    /// On failure the unit is left in an unspecified state and should be
    /// disposed.
    fn reparse(
        &mut self,
        unit: &mut Self::Unit,
        unsaved: &[UnsavedFile],
        options: ReparseOptions,
    ) -> Result<(), EngineError>;

    /// Releases a unit.
    fn dispose_unit(&mut self, unit: Self::Unit) -> Result<(), EngineError>;

    /// Returns `true` if `path` is among the files `unit` transitively includes.
    fn includes_file(&self, unit: &Self::Unit, path: &Path) -> bool;

    /// Parse options for interactive editing.
    fn default_editing_options(&self) -> ParseOptions {
        ParseOptions::editing()
    }

    /// Reparse options suited to `unit`.
    fn default_reparse_options(&self, _unit: &Self::Unit) -> ReparseOptions {
        ReparseOptions::default()
    }
}
