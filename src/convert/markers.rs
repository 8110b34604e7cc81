//! Empty progress marker files, written when a run opts in.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::warn;

pub fn completed_marker(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("completed{index}.txt"))
}

pub fn skipped_marker(dir: &Path, skipped: usize) -> PathBuf {
    dir.join(format!("skipped{skipped}entries.txt"))
}

/// Creates an empty file at `path`. Failures are logged, never propagated.
pub(crate) fn touch(path: &Path) {
    if let Err(e) = File::create(path) {
        warn!("Could not write marker '{}': {}", path.display(), e);
    }
}
