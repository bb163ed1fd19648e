//! Shared foundational types used across the tuindex workspace.
//!
//! This crate provides source/header classification, lexical path
//! normalization, unsaved-buffer overlays, parser option bitmasks, and the
//! verbosity level shared by the index, the scanning engine, and the
//! command-line front end.

#![warn(missing_docs)]

pub mod file_kind;
pub mod options;
pub mod paths;
pub mod unsaved;
pub mod verbosity;

pub use file_kind::FileKind;
pub use options::{GlobalOptions, ParseOptions, ReparseOptions};
pub use paths::normalize;
pub use unsaved::UnsavedFile;
pub use verbosity::{ParseVerbosityError, Verbosity};
