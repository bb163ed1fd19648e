//! The editor's set of unsaved buffers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tuindex_common::UnsavedFile;

use crate::error::ProviderError;
use crate::provider::OverlayProvider;

/// Unsaved buffer contents keyed by path, in the order they were first edited.
///
/// Share it with the index through `Rc<RefCell<UnsavedFiles>>` so edits made
/// after construction are seen by the next parse or reparse.
#[derive(Debug, Default)]
pub struct UnsavedFiles {
    files: IndexMap<PathBuf, Arc<str>>,
}

impl UnsavedFiles {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current contents of `path`'s buffer.
    pub fn update(&mut self, path: impl Into<PathBuf>, contents: impl Into<Arc<str>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Forgets `path`'s buffer, typically after it is saved or closed.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.files.shift_remove(path).is_some()
    }

    /// Forgets every buffer.
    pub fn remove_all(&mut self) {
        self.files.clear();
    }

    /// Returns the buffer contents for `path`.
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(|c| &**c)
    }

    /// Number of unsaved buffers.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if there are no unsaved buffers.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OverlayProvider for UnsavedFiles {
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError> {
        Ok(self
            .files
            .iter()
            .map(|(path, contents)| UnsavedFile {
                path: path.clone(),
                contents: Arc::clone(contents),
            })
            .collect())
    }
}
