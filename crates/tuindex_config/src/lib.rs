//! Parsing and validation of `tuindex.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`IndexConfig`] describing verbosity, index option flags, and where to find
//! the compile-command database.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
