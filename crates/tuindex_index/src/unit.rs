//! Cached translation units and the borrowed handles returned to callers.

use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use crate::engine::ParserEngine;

/// A cache entry: one successfully parsed source file.
///
/// Owns the engine unit exclusively. The index disposes the unit through the
/// engine whenever the entry leaves the map.
pub struct StoredUnit<U> {
    pub(crate) compile_args: Vec<String>,
    pub(crate) last_write_time: Option<SystemTime>,
    pub(crate) unit: U,
}

impl<U> StoredUnit<U> {
    pub(crate) fn new(compile_args: Vec<String>, last_write_time: Option<SystemTime>, unit: U) -> Self {
        Self {
            compile_args,
            last_write_time,
            unit,
        }
    }

    /// Arguments used for the last successful parse.
    pub fn compile_args(&self) -> &[String] {
        &self.compile_args
    }

    /// Modification time observed at the last parse or reparse.
    ///
    /// `None` if the file's metadata could not be read at that point.
    pub fn last_write_time(&self) -> Option<SystemTime> {
        self.last_write_time
    }

    /// The engine unit.
    pub fn unit(&self) -> &U {
        &self.unit
    }
}

impl<U> fmt::Debug for StoredUnit<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredUnit")
            .field("compile_args", &self.compile_args)
            .field("last_write_time", &self.last_write_time)
            .finish_non_exhaustive()
    }
}

/// A non-owning view of a cached translation unit.
///
/// Borrows from the [`SourceIndex`](crate::SourceIndex) that produced it, so it
/// cannot outlive the next mutation of the cache.
pub struct TranslationUnit<'a, E: ParserEngine> {
    path: &'a Path,
    unit: &'a E::Unit,
    engine: &'a E,
}

impl<'a, E: ParserEngine> TranslationUnit<'a, E> {
    pub(crate) fn new(path: &'a Path, unit: &'a E::Unit, engine: &'a E) -> Self {
        Self { path, unit, engine }
    }

    /// Absolute path of the translation unit's main source file.
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// The engine unit.
    pub fn unit(&self) -> &'a E::Unit {
        self.unit
    }

    /// Returns `true` if this unit transitively includes `path`.
    pub fn includes_file(&self, path: &Path) -> bool {
        self.engine.includes_file(self.unit, path)
    }
}

impl<E: ParserEngine> Clone for TranslationUnit<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ParserEngine> Copy for TranslationUnit<'_, E> {}

impl<E: ParserEngine> fmt::Debug for TranslationUnit<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
