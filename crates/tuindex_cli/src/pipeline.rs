//! Shared setup for CLI commands.
//!
//! Resolves the configuration file, loads the compile-command database it
//! points at, and builds a [`SourceIndex`] backed by the include scanner.

use std::path::{Path, PathBuf};

use tracing::debug;
use tuindex_common::Verbosity;
use tuindex_config::{find_config, load_config, IndexConfig};
use tuindex_index::{CompileCommands, SourceIndex};
use tuindex_scan::IncludeScanner;

use crate::GlobalArgs;

/// A loaded configuration and the directory its relative paths are based on.
#[derive(Debug)]
pub struct Session {
    /// The parsed configuration, or the defaults when no file was found.
    pub config: IndexConfig,
    /// Directory of the configuration file, or the current directory.
    pub base_dir: PathBuf,
}

impl Session {
    /// Resolves the configuration from global CLI args.
    ///
    /// If `--config` is given it must name a readable file. Otherwise the
    /// nearest `tuindex.toml` above the current directory is used, falling
    /// back to the defaults when there is none.
    pub fn resolve(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let cwd = std::env::current_dir()?;
        let config_path = match global.config {
            Some(ref path) => Some(cwd.join(path)),
            None => find_config(&cwd),
        };
        match config_path {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no configuration file found; using defaults");
                Ok(Self {
                    config: IndexConfig::default(),
                    base_dir: cwd,
                })
            }
        }
    }

    /// Loads the configuration at `path`.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = load_config(path)
            .map_err(|e| format!("failed to load {}: {e}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(Self {
            config,
            base_dir: path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Path of the compile-command database.
    ///
    /// `--compile-commands` wins over the configuration; the configured path
    /// is relative to the configuration file's directory.
    pub fn compile_commands_path(&self, global: &GlobalArgs) -> PathBuf {
        match global.compile_commands {
            Some(ref path) => PathBuf::from(path),
            None => self.base_dir.join(&self.config.database.compile_commands),
        }
    }

    /// Loads the compile-command database with the configured default args.
    pub fn database(&self, global: &GlobalArgs) -> Result<CompileCommands, Box<dyn std::error::Error>> {
        let db = CompileCommands::load(&self.compile_commands_path(global))?;
        debug!(entries = db.len(), "loaded compile commands");
        Ok(db.with_default_args(self.config.database.default_args.clone()))
    }

    /// Effective verbosity: quiet wins, otherwise the higher of the
    /// configured level and the `-v` count.
    pub fn verbosity(&self, global: &GlobalArgs) -> Verbosity {
        if global.quiet {
            Verbosity::QUIET
        } else {
            self.config.index.verbosity.max(Verbosity::new(global.verbose))
        }
    }

    /// Builds an index over the compile-command database.
    pub fn index(
        &self,
        global: &GlobalArgs,
    ) -> Result<SourceIndex<IncludeScanner>, Box<dyn std::error::Error>> {
        let db = self.database(global)?;
        let mut index = SourceIndex::initialize(IncludeScanner::new(), db, self.verbosity(global));
        index.set_global_options(self.config.index.global_options());
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tuindex_common::GlobalOptions;
    use tuindex_index::CompilationDatabase;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: 0,
            config: None,
            compile_commands: None,
        }
    }

    fn write_project(tmp: &TempDir) -> PathBuf {
        fs::create_dir_all(tmp.path().join("build")).unwrap();
        fs::write(
            tmp.path().join("tuindex.toml"),
            "[index]\nverbosity = 1\nbackground_editing = true\n\n[database]\ncompile_commands = \"build/compile_commands.json\"\ndefault_args = [\"-std=c11\"]\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("build/compile_commands.json"),
            r#"[{"directory": "/p", "file": "/p/a.c", "arguments": ["cc", "-DA", "/p/a.c"]}]"#,
        )
        .unwrap();
        tmp.path().join("tuindex.toml")
    }

    #[test]
    fn from_file_uses_config_dir_as_base() {
        let tmp = TempDir::new().unwrap();
        let path = write_project(&tmp);
        let session = Session::from_file(&path).unwrap();
        assert_eq!(session.base_dir, tmp.path());
        assert_eq!(
            session.compile_commands_path(&global()),
            tmp.path().join("build/compile_commands.json")
        );
    }

    #[test]
    fn compile_commands_flag_overrides_config() {
        let tmp = TempDir::new().unwrap();
        let session = Session::from_file(&write_project(&tmp)).unwrap();
        let global = GlobalArgs {
            compile_commands: Some("/elsewhere/cc.json".to_string()),
            ..global()
        };
        assert_eq!(
            session.compile_commands_path(&global),
            PathBuf::from("/elsewhere/cc.json")
        );
    }

    #[test]
    fn missing_config_file_errors() {
        let tmp = TempDir::new().unwrap();
        let err = Session::from_file(&tmp.path().join("tuindex.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn verbosity_combines_config_and_flags() {
        let tmp = TempDir::new().unwrap();
        let session = Session::from_file(&write_project(&tmp)).unwrap();
        assert_eq!(session.verbosity(&global()), Verbosity::VERBOSE);

        let loud = GlobalArgs {
            verbose: 5,
            ..global()
        };
        assert_eq!(session.verbosity(&loud), Verbosity::TRACE);

        let quiet = GlobalArgs {
            quiet: true,
            verbose: 2,
            ..global()
        };
        assert_eq!(session.verbosity(&quiet), Verbosity::QUIET);
    }

    #[test]
    fn database_gets_default_args() {
        let tmp = TempDir::new().unwrap();
        let session = Session::from_file(&write_project(&tmp)).unwrap();
        let db = session.database(&global()).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.get(Path::new("/p/a.c")).unwrap(), ["-DA"]);
        assert_eq!(db.compile_args(Path::new("/p/b.c")).unwrap(), ["-std=c11"]);
    }

    #[test]
    fn index_carries_configured_options() {
        let tmp = TempDir::new().unwrap();
        let session = Session::from_file(&write_project(&tmp)).unwrap();
        let index = session.index(&global()).unwrap();
        assert_eq!(
            index.global_options(),
            GlobalOptions::THREAD_BACKGROUND_PRIORITY_FOR_EDITING
        );
        assert_eq!(index.verbosity(), Verbosity::VERBOSE);
    }
}
