//! Lexical path normalization shared by every component that keys on paths.

use std::path::{Component, Path, PathBuf};

/// Removes `.` and resolvable `..` components without touching the file system.
///
/// Symlinks are not resolved, so `a/link/../b` becomes `a/b` even if `link`
/// points elsewhere. A `..` that would climb above the start of a relative
/// path is kept, and one directly under the root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
