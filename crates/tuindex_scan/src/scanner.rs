//! The include-scanning engine.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{info, warn};
use tuindex_common::{normalize, GlobalOptions, ParseOptions, ReparseOptions, UnsavedFile};
use tuindex_index::{EngineError, ParserEngine};

use crate::directive::scan_directives;
use crate::search_path::SearchPath;

/// Status reported when the main file of a unit cannot be read.
pub const STATUS_UNREADABLE: i32 = 1;

/// Engine flag asking for the search path to be reported.
const VERBOSE_FLAG: &str = "-v";

/// Engine index: global flags and the diagnostics switch.
#[derive(Debug)]
pub struct ScanIndex {
    options: GlobalOptions,
    display_diagnostics: bool,
}

impl ScanIndex {
    /// Returns `true` if units created from this index report unresolved includes.
    pub fn display_diagnostics(&self) -> bool {
        self.display_diagnostics
    }
}

/// The scanned include closure of one source file.
#[derive(Debug)]
pub struct ScannedUnit {
    id: u64,
    path: PathBuf,
    args: Vec<String>,
    includes: IndexSet<PathBuf>,
    unresolved: Vec<String>,
    display_diagnostics: bool,
}

impl ScannedUnit {
    /// Identity of this unit; distinct for every successful parse.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The main source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arguments the unit was parsed with.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Every file reached through includes, in discovery order.
    pub fn includes(&self) -> impl Iterator<Item = &Path> + '_ {
        self.includes.iter().map(PathBuf::as_path)
    }

    /// Include names that matched no file on the search path.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }
}

/// A [`ParserEngine`] that follows `#include` directives.
#[derive(Debug, Default)]
pub struct IncludeScanner {
    next_id: u64,
}

impl IncludeScanner {
    /// Creates a scanner.
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(
        &self,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
    ) -> Result<(IndexSet<PathBuf>, Vec<String>), EngineError> {
        let main = read_source(path, unsaved).ok_or_else(|| {
            EngineError::new(
                STATUS_UNREADABLE,
                format!("cannot read {}", path.display()),
            )
        })?;

        let base = path.parent().unwrap_or(Path::new("/"));
        let search = SearchPath::from_args(args, base);
        if args.iter().any(|a| a == VERBOSE_FLAG) {
            info!(path = %path.display(), search = ?search, "include search path");
        }

        let mut includes = IndexSet::new();
        let mut unresolved = Vec::new();
        let mut queue = VecDeque::from([(path.to_path_buf(), main)]);

        while let Some((file, text)) = queue.pop_front() {
            let dir = file.parent().unwrap_or(Path::new("/"));
            for directive in scan_directives(&text) {
                let found = search
                    .candidates(directive.kind, dir)
                    .map(|d| normalize(&d.join(directive.name)))
                    .find(|candidate| exists(candidate, unsaved));
                let Some(found) = found else {
                    unresolved.push(directive.name.to_string());
                    continue;
                };
                if found == path || !includes.insert(found.clone()) {
                    continue;
                }
                if let Some(text) = read_source(&found, unsaved) {
                    queue.push_back((found, text));
                }
            }
        }

        Ok((includes, unresolved))
    }
}

impl ParserEngine for IncludeScanner {
    type Index = ScanIndex;
    type Unit = ScannedUnit;

    fn create_index(&mut self, display_diagnostics: bool) -> ScanIndex {
        ScanIndex {
            options: GlobalOptions::NONE,
            display_diagnostics,
        }
    }

    fn dispose_index(&mut self, _index: ScanIndex) -> Result<(), EngineError> {
        Ok(())
    }

    fn global_options(&self, index: &ScanIndex) -> GlobalOptions {
        index.options
    }

    fn set_global_options(&mut self, index: &mut ScanIndex, options: GlobalOptions) {
        index.options = options;
    }

    fn parse(
        &mut self,
        index: &ScanIndex,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        _options: ParseOptions,
    ) -> Result<ScannedUnit, EngineError> {
        let (includes, unresolved) = self.scan(path, args, unsaved)?;
        self.next_id += 1;
        let unit = ScannedUnit {
            id: self.next_id,
            path: path.to_path_buf(),
            args: args.to_vec(),
            includes,
            unresolved,
            display_diagnostics: index.display_diagnostics,
        };
        report_unresolved(&unit);
        Ok(unit)
    }

    fn reparse(
        &mut self,
        unit: &mut ScannedUnit,
        unsaved: &[UnsavedFile],
        _options: ReparseOptions,
    ) -> Result<(), EngineError> {
        let (includes, unresolved) = self.scan(&unit.path, &unit.args, unsaved)?;
        unit.includes = includes;
        unit.unresolved = unresolved;
        report_unresolved(unit);
        Ok(())
    }

    fn dispose_unit(&mut self, _unit: ScannedUnit) -> Result<(), EngineError> {
        Ok(())
    }

    fn includes_file(&self, unit: &ScannedUnit, path: &Path) -> bool {
        unit.includes.contains(&normalize(path))
    }
}

fn report_unresolved(unit: &ScannedUnit) {
    if !unit.display_diagnostics {
        return;
    }
    for name in &unit.unresolved {
        warn!(path = %unit.path.display(), include = %name, "include not found");
    }
}

fn read_source(path: &Path, unsaved: &[UnsavedFile]) -> Option<String> {
    match UnsavedFile::find(unsaved, path) {
        Some(overlay) => Some(overlay.contents.to_string()),
        None => std::fs::read_to_string(path).ok(),
    }
}

fn exists(path: &Path, unsaved: &[UnsavedFile]) -> bool {
    UnsavedFile::find(unsaved, path).is_some() || path.is_file()
}
