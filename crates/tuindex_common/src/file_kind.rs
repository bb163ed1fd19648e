//! Classification of paths into compilable sources and headers.

use std::fmt;
use std::path::Path;

/// Extensions (lowercase, without the dot) the parser engine accepts as
/// standalone translation units.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "m", "mm"];

/// Whether a path can be parsed on its own or must be reached through an
/// including translation unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FileKind {
    /// A C, C++, Objective-C, or Objective-C++ source file.
    Source,
    /// Anything else. Headers have no compile arguments of their own.
    Header,
}

impl FileKind {
    /// Classifies a path by its extension, ignoring case.
    ///
    /// Paths without an extension are headers (e.g. `<vector>`-style files).
    pub fn classify(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return FileKind::Header;
        };
        let ext = ext.to_ascii_lowercase();
        if SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Source
        } else {
            FileKind::Header
        }
    }

    /// Returns `true` for [`FileKind::Source`].
    pub fn is_source(self) -> bool {
        self == FileKind::Source
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Source => write!(f, "source"),
            FileKind::Header => write!(f, "header"),
        }
    }
}
