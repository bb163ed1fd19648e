//! In-memory overrides of on-disk file contents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The contents of an editor buffer that has not been saved to disk.
///
/// Parses and reparses see `contents` instead of whatever is on disk at
/// `path`. Contents are shared so that snapshots handed to the engine on every
/// call stay cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsavedFile {
    /// Absolute path of the overridden file.
    pub path: PathBuf,
    /// The buffer text.
    pub contents: Arc<str>,
}

impl UnsavedFile {
    /// Creates an overlay for `path`.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Returns the overlay for `path` from a set of overlays, if any.
    pub fn find<'a>(overlays: &'a [UnsavedFile], path: &Path) -> Option<&'a UnsavedFile> {
        overlays.iter().find(|o| o.path == path)
    }
}
