//! Configuration types deserialized from `tuindex.toml`.

use serde::Deserialize;
use tuindex_common::{GlobalOptions, Verbosity};

/// Default location of the compile-command database, relative to the
/// configuration file's directory.
pub const DEFAULT_COMPILE_COMMANDS: &str = "compile_commands.json";

/// The top-level configuration parsed from `tuindex.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct IndexConfig {
    /// Parse index settings.
    #[serde(default)]
    pub index: IndexSection,
    /// Compile-command database settings.
    #[serde(default)]
    pub database: DatabaseSection,
}

/// Settings for the parse index itself.
#[derive(Debug, Default, Deserialize)]
pub struct IndexSection {
    /// Indexing verbosity (0, 1, or 2).
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Run indexing work at background thread priority.
    #[serde(default)]
    pub background_indexing: bool,
    /// Run editing work at background thread priority.
    #[serde(default)]
    pub background_editing: bool,
}

impl IndexSection {
    /// Folds the background-priority switches into index option flags.
    pub fn global_options(&self) -> GlobalOptions {
        let mut opts = GlobalOptions::NONE;
        if self.background_indexing {
            opts = opts | GlobalOptions::THREAD_BACKGROUND_PRIORITY_FOR_INDEXING;
        }
        if self.background_editing {
            opts = opts | GlobalOptions::THREAD_BACKGROUND_PRIORITY_FOR_EDITING;
        }
        opts
    }
}

/// Where compile arguments come from.
#[derive(Debug, Deserialize)]
pub struct DatabaseSection {
    /// Path to `compile_commands.json`, relative to the configuration file.
    #[serde(default = "default_compile_commands")]
    pub compile_commands: String,
    /// Arguments for source files that have no entry in the database.
    #[serde(default)]
    pub default_args: Vec<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            compile_commands: default_compile_commands(),
            default_args: Vec::new(),
        }
    }
}

fn default_compile_commands() -> String {
    DEFAULT_COMPILE_COMMANDS.to_string()
}
