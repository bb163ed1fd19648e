//! Include search path derived from compile arguments.

use std::path::{Path, PathBuf};

use tuindex_common::normalize;

use crate::directive::IncludeKind;

/// Directories searched for included files.
///
/// Quoted includes look in the includer's directory, then `-iquote`
/// directories, then the angled path. Angled includes search `-I`
/// directories followed by `-isystem` directories, each in argument order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    quote: Vec<PathBuf>,
    user: Vec<PathBuf>,
    system: Vec<PathBuf>,
}

impl SearchPath {
    /// Builds the search path from a compile argument list.
    ///
    /// Both joined (`-Idir`) and separate (`-I dir`) spellings are accepted.
    /// Relative directories are taken relative to `base`.
    pub fn from_args(args: &[String], base: &Path) -> Self {
        let mut path = SearchPath::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (list, value) = if let Some(rest) = arg.strip_prefix("-isystem") {
                (&mut path.system, rest)
            } else if let Some(rest) = arg.strip_prefix("-iquote") {
                (&mut path.quote, rest)
            } else if let Some(rest) = arg.strip_prefix("-I") {
                (&mut path.user, rest)
            } else {
                continue;
            };
            let dir = if value.is_empty() {
                match iter.next() {
                    Some(next) => next.as_str(),
                    None => break,
                }
            } else {
                value
            };
            list.push(normalize(&base.join(dir)));
        }
        path
    }

    /// Directories an include of `kind` written in a file under `includer_dir` searches.
    pub fn candidates<'a>(
        &'a self,
        kind: IncludeKind,
        includer_dir: &'a Path,
    ) -> impl Iterator<Item = &'a Path> + 'a {
        let quoted = (kind == IncludeKind::Quoted)
            .then(|| std::iter::once(includer_dir).chain(self.quote.iter().map(PathBuf::as_path)));
        quoted
            .into_iter()
            .flatten()
            .chain(self.user.iter().map(PathBuf::as_path))
            .chain(self.system.iter().map(PathBuf::as_path))
    }

    /// Returns `true` if no directories were given.
    pub fn is_empty(&self) -> bool {
        self.quote.is_empty() && self.user.is_empty() && self.system.is_empty()
    }
}
