//! Read-only collaborators queried by the index on every request.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use tuindex_common::UnsavedFile;

use crate::error::ProviderError;

/// Source of compile arguments and of the set of compilable files.
pub trait CompilationDatabase {
    /// Returns the ordered compile arguments for `path`.
    fn compile_args(&self, path: &Path) -> Result<Vec<String>, ProviderError>;

    /// Returns every known source file, in a stable order.
    fn source_files(&self) -> Result<Vec<PathBuf>, ProviderError>;
}

/// Source of unsaved editor buffers.
pub trait OverlayProvider {
    /// Returns a snapshot of the current overlays.
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError>;
}

/// File metadata access.
pub trait FileSystem {
    /// Returns the last modification time of `path`.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when the file is absent.
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime>;
}

/// An [`OverlayProvider`] with no unsaved buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlays;

impl OverlayProvider for NoOverlays {
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError> {
        Ok(Vec::new())
    }
}

/// A [`FileSystem`] backed by the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

// Shared handles let a front end keep mutating a collaborator (reloading a
// database, editing buffers) after handing it to the index.

impl<T: CompilationDatabase + ?Sized> CompilationDatabase for Rc<T> {
    fn compile_args(&self, path: &Path) -> Result<Vec<String>, ProviderError> {
        (**self).compile_args(path)
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, ProviderError> {
        (**self).source_files()
    }
}

impl<T: CompilationDatabase> CompilationDatabase for RefCell<T> {
    fn compile_args(&self, path: &Path) -> Result<Vec<String>, ProviderError> {
        self.try_borrow()
            .map_err(|_| ProviderError::new("compilation database is being modified"))?
            .compile_args(path)
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, ProviderError> {
        self.try_borrow()
            .map_err(|_| ProviderError::new("compilation database is being modified"))?
            .source_files()
    }
}

impl<T: OverlayProvider + ?Sized> OverlayProvider for Rc<T> {
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError> {
        (**self).overlays()
    }
}

impl<T: OverlayProvider> OverlayProvider for RefCell<T> {
    fn overlays(&self) -> Result<Vec<UnsavedFile>, ProviderError> {
        self.try_borrow()
            .map_err(|_| ProviderError::new("unsaved files are being modified"))?
            .overlays()
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Rc<T> {
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).last_write_time(path)
    }
}

impl<T: FileSystem> FileSystem for RefCell<T> {
    fn last_write_time(&self, path: &Path) -> io::Result<SystemTime> {
        self.try_borrow()
            .map_err(|_| io::Error::other("file system is being modified"))?
            .last_write_time(path)
    }
}
