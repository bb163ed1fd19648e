//! Recording fakes for exercising the index without a real front end.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use tuindex_common::{GlobalOptions, ParseOptions, ReparseOptions, UnsavedFile};

use crate::engine::ParserEngine;
use crate::error::{EngineError, ProviderError};
use crate::provider::{CompilationDatabase, FileSystem, OverlayProvider};

/// Engine calls observed so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Calls {
    pub create_index: usize,
    pub dispose_index: usize,
    pub parse: usize,
    pub reparse: usize,
    pub dispose_unit: usize,
}

impl Calls {
    /// Calls that touch translation units.
    pub fn unit_calls(&self) -> usize {
        self.parse + self.reparse + self.dispose_unit
    }
}

#[derive(Debug)]
pub(crate) struct FakeIndex {
    pub options: GlobalOptions,
    pub display_diagnostics: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FakeUnit {
    pub id: u64,
    pub path: PathBuf,
    pub reparses: usize,
}

/// An engine whose include graph and failures are scripted by the test.
#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    pub calls: Calls,
    pub includes: HashMap<PathBuf, Vec<PathBuf>>,
    pub fail_parse: HashSet<PathBuf>,
    pub fail_reparse: HashSet<PathBuf>,
    pub fail_dispose: bool,
    pub parse_order: Vec<PathBuf>,
    pub last_args: HashMap<PathBuf, Vec<String>>,
    pub last_options: Option<ParseOptions>,
    pub last_unsaved: Vec<UnsavedFile>,
    pub live: HashSet<u64>,
    next_id: u64,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `source` includes each of `headers`.
    pub fn with_includes(mut self, source: &str, headers: &[&str]) -> Self {
        self.includes.insert(
            PathBuf::from(source),
            headers.iter().map(PathBuf::from).collect(),
        );
        self
    }
}

impl ParserEngine for FakeEngine {
    type Index = FakeIndex;
    type Unit = FakeUnit;

    fn create_index(&mut self, display_diagnostics: bool) -> FakeIndex {
        self.calls.create_index += 1;
        FakeIndex {
            options: GlobalOptions::NONE,
            display_diagnostics,
        }
    }

    fn dispose_index(&mut self, _index: FakeIndex) -> Result<(), EngineError> {
        self.calls.dispose_index += 1;
        Ok(())
    }

    fn global_options(&self, index: &FakeIndex) -> GlobalOptions {
        index.options
    }

    fn set_global_options(&mut self, index: &mut FakeIndex, options: GlobalOptions) {
        index.options = options;
    }

    fn parse(
        &mut self,
        _index: &FakeIndex,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<FakeUnit, EngineError> {
        self.calls.parse += 1;
        self.parse_order.push(path.to_path_buf());
        self.last_args.insert(path.to_path_buf(), args.to_vec());
        self.last_options = Some(options);
        self.last_unsaved = unsaved.to_vec();
        if self.fail_parse.contains(path) {
            return Err(EngineError::new(1, "scripted parse failure"));
        }
        self.next_id += 1;
        self.live.insert(self.next_id);
        Ok(FakeUnit {
            id: self.next_id,
            path: path.to_path_buf(),
            reparses: 0,
        })
    }

    fn reparse(
        &mut self,
        unit: &mut FakeUnit,
        unsaved: &[UnsavedFile],
        _options: ReparseOptions,
    ) -> Result<(), EngineError> {
        self.calls.reparse += 1;
        self.last_unsaved = unsaved.to_vec();
        if self.fail_reparse.contains(&unit.path) {
            return Err(EngineError::new(2, "scripted reparse failure"));
        }
        unit.reparses += 1;
        Ok(())
    }

    fn dispose_unit(&mut self, unit: FakeUnit) -> Result<(), EngineError> {
        self.calls.dispose_unit += 1;
        self.live.remove(&unit.id);
        if self.fail_dispose {
            return Err(EngineError::new(3, "scripted dispose failure"));
        }
        Ok(())
    }

    fn includes_file(&self, unit: &FakeUnit, path: &Path) -> bool {
        self.includes
            .get(&unit.path)
            .is_some_and(|headers| headers.iter().any(|h| h == path))
    }
}

/// A compilation database with per-file arguments and a source listing.
#[derive(Debug, Default)]
pub(crate) struct FakeDatabase {
    pub args: HashMap<PathBuf, Vec<String>>,
    pub default_args: Vec<String>,
    pub sources: Vec<PathBuf>,
    pub unavailable: bool,
}

impl FakeDatabase {
    pub fn shared(sources: &[&str], default_args: &[&str]) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            sources: sources.iter().map(PathBuf::from).collect(),
            default_args: default_args.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }))
    }

    pub fn set_args(&mut self, path: &str, args: &[&str]) {
        self.args.insert(
            PathBuf::from(path),
            args.iter().map(|a| a.to_string()).collect(),
        );
    }
}

impl CompilationDatabase for FakeDatabase {
    fn compile_args(&self, path: &Path) -> Result<Vec<String>, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::new("database offline"));
        }
        Ok(self
            .args
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_args.clone()))
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::new("database offline"));
        }
        Ok(self.sources.clone())
    }
}

/// Modification times under test control. Unknown paths are `NotFound`.
#[derive(Debug, Default)]
pub(crate) struct FakeFs {
    pub mtimes: HashMap<PathBuf, SystemTime>,
}

impl FakeFs {
    pub fn shared(paths: &[&str]) -> Rc<RefCell<Self>> {
        let mtimes = paths
            .iter()
            .map(|p| (PathBuf::from(p), SystemTime::UNIX_EPOCH))
            .collect();
        Rc::new(RefCell::new(Self { mtimes }))
    }

    /// Advances the modification time of `path` by one second.
    pub fn touch(&mut self, path: &str) {
        let t = self
            .mtimes
            .entry(PathBuf::from(path))
            .or_insert(SystemTime::UNIX_EPOCH);
        *t += Duration::from_secs(1);
    }
}

impl FileSystem for FakeFs {
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime> {
        self.mtimes
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// Overlays that can be made to fail.
#[derive(Debug, Default)]
pub(crate) struct FakeOverlays {
    pub files: Vec<UnsavedFile>,
    pub unavailable: bool,
}

impl OverlayProvider for FakeOverlays {
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::new("editor gone"));
        }
        Ok(self.files.clone())
    }
}
