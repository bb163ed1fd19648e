//! Scoped timing of indexing work.

use std::path::Path;
use std::time::{Duration, Instant};

/// Logs how long a translation unit took to index when dropped.
pub(crate) struct IndexTimer<'a> {
    path: &'a Path,
    start: Instant,
}

impl<'a> IndexTimer<'a> {
    pub(crate) fn start(path: &'a Path) -> Self {
        tracing::info!(path = %path.display(), "indexing translation unit");
        Self {
            path,
            start: Instant::now(),
        }
    }
}

impl Drop for IndexTimer<'_> {
    fn drop(&mut self) {
        tracing::info!(
            path = %self.path.display(),
            elapsed_ms = millis(self.start.elapsed()),
            "indexed translation unit"
        );
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
