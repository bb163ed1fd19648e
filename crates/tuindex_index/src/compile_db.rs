//! A [`CompilationDatabase`] backed by `compile_commands.json`.
//!
//! The JSON compilation database format is an array of entries, each with a
//! working `directory`, a `file`, and either an `arguments` array or a single
//! shell-quoted `command` string. Arguments are normalized into what a
//! front end needs to parse the file in an editor: the compiler name, `-c`,
//! output flags, and the file itself are dropped, and include directories are
//! made absolute.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tuindex_common::{normalize, FileKind};

use crate::error::{CompileDbError, ProviderError};
use crate::provider::CompilationDatabase;

/// Include-path flags whose value is a directory.
const INCLUDE_FLAGS: &[&str] = &["-I", "-iquote", "-isystem"];

/// One raw entry of `compile_commands.json`.
#[derive(Debug, Deserialize)]
struct CompileCommandEntry {
    directory: PathBuf,
    file: PathBuf,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    #[serde(default)]
    command: Option<String>,
}

/// Compile arguments for every file in a `compile_commands.json`.
#[derive(Debug, Default)]
pub struct CompileCommands {
    /// Where the database was loaded from, for [`reload`](Self::reload).
    path: Option<PathBuf>,
    /// Absolute source path to normalized arguments, in file order.
    entries: IndexMap<PathBuf, Vec<String>>,
    /// Arguments for files with no entry.
    default_args: Vec<String>,
}

impl CompileCommands {
    /// Loads a database from disk.
    pub fn load(path: &Path) -> Result<Self, CompileDbError> {
        let json = std::fs::read_to_string(path).map_err(|source| CompileDbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut db = Self::from_json(&json)?;
        db.path = Some(path.to_path_buf());
        Ok(db)
    }

    /// Parses a database from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CompileDbError> {
        let raw: Vec<CompileCommandEntry> =
            serde_json::from_str(json).map_err(|e| CompileDbError::Parse {
                reason: e.to_string(),
            })?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for entry in raw {
            let file = normalize(&entry.directory.join(&entry.file));
            let argv = match (entry.arguments, entry.command) {
                (Some(arguments), _) => arguments,
                (None, Some(command)) => shlex::split(&command)
                    .ok_or_else(|| CompileDbError::InvalidCommand { file: file.clone() })?,
                (None, None) => return Err(CompileDbError::MissingCommand { file }),
            };
            let args = normalize_arguments(&argv, &entry.directory, &file);
            // The first entry for a file wins, as most tools do.
            entries.entry(file).or_insert(args);
        }

        Ok(Self {
            path: None,
            entries,
            default_args: Vec::new(),
        })
    }

    /// Sets the arguments used for files the database does not list.
    pub fn with_default_args(mut self, default_args: Vec<String>) -> Self {
        self.default_args = default_args;
        self
    }

    /// Re-reads the database from the file it was loaded from.
    ///
    /// A database built with [`from_json`](Self::from_json) has nothing to
    /// reload and is left unchanged. On error the previous entries are kept.
    pub fn reload(&mut self) -> Result<(), CompileDbError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let fresh = Self::load(&path)?;
        self.entries = fresh.entries;
        Ok(())
    }

    /// Number of distinct files in the database.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the database lists no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the normalized arguments for `path`, if the database lists it.
    pub fn get(&self, path: &Path) -> Option<&[String]> {
        self.entries.get(&normalize(path)).map(Vec::as_slice)
    }
}

impl CompilationDatabase for CompileCommands {
    fn compile_args(&self, path: &Path) -> Result<Vec<String>, ProviderError> {
        Ok(self
            .get(path)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| self.default_args.clone()))
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, ProviderError> {
        Ok(self
            .entries
            .keys()
            .filter(|path| FileKind::classify(path).is_source())
            .cloned()
            .collect())
    }
}

/// Strips everything that is not a parse-relevant flag from a compiler command line.
fn normalize_arguments(argv: &[String], directory: &Path, file: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(argv.len());
    // argv[0] is the compiler.
    let mut iter = argv.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" => {}
            "-o" => {
                iter.next();
            }
            a if a.starts_with("-o") => {}
            a if INCLUDE_FLAGS.contains(&a) => {
                args.push(a.to_string());
                if let Some(dir) = iter.next() {
                    args.push(absolutize(dir, directory));
                }
            }
            a => {
                if let Some((flag, dir)) = split_include_flag(a) {
                    args.push(format!("{flag}{}", absolutize(dir, directory)));
                } else if !is_input_file(a, directory, file) {
                    args.push(a.to_string());
                }
            }
        }
    }
    args
}

/// Splits a joined include flag such as `-Iinclude` into `("-I", "include")`.
fn split_include_flag(arg: &str) -> Option<(&'static str, &str)> {
    // Longest flags first so `-isystem` is never read as `-i` + `system`.
    ["-isystem", "-iquote", "-I"].into_iter().find_map(|flag| {
        arg.strip_prefix(flag)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (flag, rest))
    })
}

fn absolutize(dir: &str, directory: &Path) -> String {
    normalize(&directory.join(dir)).to_string_lossy().into_owned()
}

fn is_input_file(arg: &str, directory: &Path, file: &Path) -> bool {
    if arg.starts_with('-') {
        return false;
    }
    normalize(&directory.join(arg)) == file
}
