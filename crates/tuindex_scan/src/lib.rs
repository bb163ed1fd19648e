//! A lightweight include-scanning [`ParserEngine`](tuindex_index::ParserEngine).
//!
//! [`IncludeScanner`] "parses" a C-family source file by following its
//! `#include` directives through the search path its compile arguments
//! describe, producing the transitive include closure. It does not evaluate
//! conditional compilation or macros, which makes it cheap enough to back the
//! index in tools and tests where a native front end is unavailable.

#![warn(missing_docs)]

pub mod directive;
pub mod scanner;
pub mod search_path;

pub use directive::{Directive, IncludeKind};
pub use scanner::{IncludeScanner, ScanIndex, ScannedUnit};
pub use search_path::SearchPath;
