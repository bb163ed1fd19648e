//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::IndexConfig;
use std::path::{Path, PathBuf};

/// File name of the configuration file.
pub const CONFIG_FILE: &str = "tuindex.toml";

/// Walks up from `start` looking for the nearest directory containing `tuindex.toml`.
///
/// Returns the path of the configuration file itself, or `None` if no ancestor has one.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<IndexConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tuindex.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<IndexConfig, ConfigError> {
    let config: IndexConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &IndexConfig) -> Result<(), ConfigError> {
    if config.database.compile_commands.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.compile_commands is empty".to_string(),
        ));
    }
    if config.database.default_args.iter().any(|a| a.is_empty()) {
        return Err(ConfigError::ValidationError(
            "database.default_args contains an empty argument".to_string(),
        ));
    }
    Ok(())
}
