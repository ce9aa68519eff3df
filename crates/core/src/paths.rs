//! Small path helpers shared across the crate

use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
