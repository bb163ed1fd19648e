//! The parse cache manager.
//!
//! [`SourceIndex`] owns the engine index and one [`StoredUnit`] per source
//! file. For a source path it applies a three-tier staleness policy:
//!
//! 1. compile arguments and modification time unchanged: reuse the unit;
//! 2. only the modification time changed: reparse the unit in place;
//! 3. arguments changed, no entry yet, or the reparse failed: dispose any old
//!    unit and parse from scratch.
//!
//! Header paths are answered by the first cached unit that includes them, or
//! failing that by parsing known source files one at a time until one does.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use indexmap::IndexMap;
use tracing::{debug, error, warn};
use tuindex_common::{normalize, FileKind, GlobalOptions, Verbosity};

use crate::engine::ParserEngine;
use crate::error::{IndexError, ProviderError};
use crate::provider::{
    CompilationDatabase, DiskFileSystem, FileSystem, NoOverlays, OverlayProvider,
};
use crate::timer::IndexTimer;
use crate::unit::{StoredUnit, TranslationUnit};

/// Extra engine argument appended at the highest verbosity tier.
const ENGINE_VERBOSE_FLAG: &str = "-v";

const DATABASE: &str = "compilation database";
const OVERLAYS: &str = "unsaved file provider";

/// Incremental cache of translation units keyed by absolute path.
///
/// All operations run on the caller's thread and block for the duration of
/// any parse. The type is not `Sync`; callers sharing it across threads must
/// serialize access themselves.
pub struct SourceIndex<E: ParserEngine> {
    engine: E,
    /// `None` once [`shutdown`](Self::shutdown) has run.
    index: Option<E::Index>,
    units: IndexMap<PathBuf, StoredUnit<E::Unit>>,
    database: Box<dyn CompilationDatabase>,
    overlays: Box<dyn OverlayProvider>,
    file_system: Box<dyn FileSystem>,
    verbosity: Verbosity,
}

impl<E: ParserEngine> SourceIndex<E> {
    /// Creates the engine index and the empty cache.
    ///
    /// The engine displays its own diagnostics at any verbosity above quiet.
    /// Overlays default to [`NoOverlays`] and modification times are read from
    /// disk; see [`with_overlays`](Self::with_overlays) and
    /// [`with_file_system`](Self::with_file_system).
    pub fn initialize(
        mut engine: E,
        database: impl CompilationDatabase + 'static,
        verbosity: Verbosity,
    ) -> Self {
        let index = engine.create_index(verbosity.is_verbose());
        Self {
            engine,
            index: Some(index),
            units: IndexMap::new(),
            database: Box::new(database),
            overlays: Box::new(NoOverlays),
            file_system: Box::new(DiskFileSystem),
            verbosity,
        }
    }

    /// Replaces the unsaved-buffer provider.
    pub fn with_overlays(mut self, overlays: impl OverlayProvider + 'static) -> Self {
        self.overlays = Box::new(overlays);
        self
    }

    /// Replaces the file metadata source.
    pub fn with_file_system(mut self, file_system: impl FileSystem + 'static) -> Self {
        self.file_system = Box::new(file_system);
        self
    }

    /// Returns the configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Returns the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of cached translation units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns `true` if a translation unit for `path` is cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.units.contains_key(&absolute_path(path))
    }

    /// Cached paths in cache order.
    pub fn cached_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.units.keys().map(PathBuf::as_path)
    }

    /// Returns the cache entry for `path` without refreshing it.
    pub fn stored(&self, path: &Path) -> Option<&StoredUnit<E::Unit>> {
        self.units.get(&absolute_path(path))
    }

    /// Returns an up-to-date translation unit for `path`.
    ///
    /// Source files go through the staleness policy; headers are resolved to
    /// an including translation unit. `Ok(None)` means no unit is available:
    /// the parse failed or no known source includes the header. The failure
    /// is logged and not retried until the next call.
    pub fn translation_unit(
        &mut self,
        path: &Path,
    ) -> Result<Option<TranslationUnit<'_, E>>, IndexError> {
        let path = absolute_path(path);
        if !FileKind::classify(&path).is_source() {
            return self.header_translation_unit(&path);
        }
        if self.refresh(&path)? {
            Ok(self.lookup(&path))
        } else {
            Ok(None)
        }
    }

    /// Parses `path` if it is not cached yet. Never refreshes an existing entry.
    pub fn prime(&mut self, path: &Path) -> Result<(), IndexError> {
        if !self.contains(path) {
            self.translation_unit(path)?;
        }
        Ok(())
    }

    /// Refreshes `path` if it is cached. Never adds a new entry.
    pub fn reprime(&mut self, path: &Path) -> Result<(), IndexError> {
        if self.contains(path) {
            self.translation_unit(path)?;
        }
        Ok(())
    }

    /// Disposes and forgets the translation unit for `path`.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let path = absolute_path(path);
        match self.units.shift_remove_entry(&path) {
            Some((path, stored)) => {
                if let Err(err) = self.dispose(path, stored) {
                    warn!("{err}");
                }
                true
            }
            None => false,
        }
    }

    /// Disposes and forgets every cached translation unit.
    ///
    /// Every unit is released even if some disposals fail; failures are
    /// logged and returned. Calling this on an empty cache does nothing.
    pub fn remove_all(&mut self) -> Vec<IndexError> {
        let mut failures = Vec::new();
        for (path, stored) in std::mem::take(&mut self.units) {
            if let Err(err) = self.dispose(path, stored) {
                warn!("{err}");
                failures.push(err);
            }
        }
        failures
    }

    /// Returns the engine index's option flags.
    ///
    /// After [`shutdown`](Self::shutdown) there is no index and no flags are set.
    pub fn global_options(&self) -> GlobalOptions {
        self.index
            .as_ref()
            .map_or(GlobalOptions::NONE, |index| self.engine.global_options(index))
    }

    /// Replaces the engine index's option flags. Ignored after shutdown.
    pub fn set_global_options(&mut self, options: GlobalOptions) {
        if let Some(index) = self.index.as_mut() {
            self.engine.set_global_options(index, options);
        }
    }

    /// Releases every unit, then the engine index.
    ///
    /// Best effort: disposal failures are logged and returned but never stop
    /// the teardown. Safe to call more than once; `Drop` calls it too.
    pub fn shutdown(&mut self) -> Vec<IndexError> {
        let mut failures = self.remove_all();
        if let Some(index) = self.index.take() {
            if let Err(source) = self.engine.dispose_index(index) {
                let err = IndexError::DisposeFailure {
                    path: PathBuf::new(),
                    source,
                };
                warn!("{err}");
                failures.push(err);
            }
        }
        failures
    }

    /// Brings the entry for source file `path` up to date.
    ///
    /// Returns `true` if a usable entry exists afterwards.
    fn refresh(&mut self, path: &Path) -> Result<bool, IndexError> {
        let _timer = self.verbosity.is_verbose().then(|| IndexTimer::start(path));

        let args = self
            .database
            .compile_args(path)
            .map_err(|source| unavailable(DATABASE, source))?;
        let last_write_time = self.last_write_time(path);

        if let Some(stored) = self.units.get_mut(path) {
            if stored.compile_args == args {
                if stored.last_write_time == last_write_time {
                    debug!(path = %path.display(), "translation unit up to date");
                    return Ok(true);
                }

                let unsaved = self
                    .overlays
                    .overlays()
                    .map_err(|source| unavailable(OVERLAYS, source))?;
                let options = self.engine.default_reparse_options(&stored.unit);
                match self.engine.reparse(&mut stored.unit, &unsaved, options) {
                    Ok(()) => {
                        debug!(path = %path.display(), "re-parsed translation unit");
                        stored.last_write_time = last_write_time;
                        return Ok(true);
                    }
                    Err(source) => {
                        let err = IndexError::ReparseFailure {
                            path: path.to_path_buf(),
                            source,
                        };
                        error!("{err}");
                    }
                }
            } else {
                debug!(path = %path.display(), "compile arguments changed; rebuilding");
            }
        }

        self.parse(path, args, last_write_time)
    }

    /// Replaces any entry for `path` with a fresh parse.
    fn parse(
        &mut self,
        path: &Path,
        args: Vec<String>,
        last_write_time: Option<SystemTime>,
    ) -> Result<bool, IndexError> {
        self.remove(path);

        let unsaved = self
            .overlays
            .overlays()
            .map_err(|source| unavailable(OVERLAYS, source))?;
        let Some(index) = self.index.as_ref() else {
            error!(path = %path.display(), "cannot parse translation unit: index has been shut down");
            return Ok(false);
        };

        let mut engine_args = args.clone();
        if self.verbosity.is_trace() {
            engine_args.push(ENGINE_VERBOSE_FLAG.to_string());
        }

        let options = self.engine.default_editing_options();
        match self.engine.parse(index, path, &engine_args, &unsaved, options) {
            Ok(unit) => {
                debug!(path = %path.display(), "parsed translation unit");
                self.units.insert(
                    path.to_path_buf(),
                    StoredUnit::new(args, last_write_time, unit),
                );
                Ok(true)
            }
            Err(source) => {
                let err = IndexError::ParseFailure {
                    path: path.to_path_buf(),
                    source,
                };
                error!("{err}");
                Ok(false)
            }
        }
    }

    /// Finds a translation unit that includes `header`.
    fn header_translation_unit(
        &mut self,
        header: &Path,
    ) -> Result<Option<TranslationUnit<'_, E>>, IndexError> {
        if let Some(path) = self.find_includer(header) {
            return Ok(self.lookup(&path));
        }

        // Nothing cached includes it; parse known sources until one does.
        let sources = self
            .database
            .source_files()
            .map_err(|source| unavailable(DATABASE, source))?;
        for source in sources {
            let source = absolute_path(&source);
            if !FileKind::classify(&source).is_source() {
                debug!(path = %source.display(), "skipping non-source entry in source listing");
                continue;
            }

            let was_cached = self.units.contains_key(&source);
            if !self.refresh(&source)? {
                continue;
            }
            if self.includes(&source, header) {
                debug!(
                    header = %header.display(),
                    source = %source.display(),
                    "resolved header"
                );
                return Ok(self.lookup(&source));
            }
            if !was_cached {
                debug!(path = %source.display(), "evicting speculative parse");
                self.remove(&source);
            }
        }

        debug!(header = %header.display(), "no known source includes header");
        Ok(None)
    }

    fn find_includer(&self, header: &Path) -> Option<PathBuf> {
        self.units
            .iter()
            .find(|(_, stored)| self.engine.includes_file(&stored.unit, header))
            .map(|(path, _)| path.clone())
    }

    fn includes(&self, source: &Path, header: &Path) -> bool {
        self.units
            .get(source)
            .is_some_and(|stored| self.engine.includes_file(&stored.unit, header))
    }

    fn lookup(&self, path: &Path) -> Option<TranslationUnit<'_, E>> {
        self.units
            .get_key_value(path)
            .map(|(path, stored)| TranslationUnit::new(path, &stored.unit, &self.engine))
    }

    fn last_write_time(&self, path: &Path) -> Option<SystemTime> {
        match self.file_system.last_write_time(path) {
            Ok(time) => Some(time),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "file not found on disk");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), "cannot read modification time: {err}");
                None
            }
        }
    }

    fn dispose(&mut self, path: PathBuf, stored: StoredUnit<E::Unit>) -> Result<(), IndexError> {
        self.engine
            .dispose_unit(stored.unit)
            .map_err(|source| IndexError::DisposeFailure { path, source })
    }
}

impl<E: ParserEngine> Drop for SourceIndex<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn unavailable(provider: &'static str, source: ProviderError) -> IndexError {
    IndexError::ProviderUnavailable { provider, source }
}

/// Makes `path` absolute against the current directory and resolves `.` and
/// `..` lexically, so every spelling of a file maps to one cache key. Falls
/// back to the path as given if the current directory is unavailable.
fn absolute_path(path: &Path) -> PathBuf {
    normalize(&std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}
