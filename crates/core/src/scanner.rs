//! Project scanning: file discovery and include-path assembly

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::types::ProtoFile;

/// Recursively discover `.proto` files under `root`
///
/// Traversal is lexicographically sorted so discovery order is reproducible
/// across runs. The extension match is case-sensitive. Unreadable entries are
/// skipped.
pub fn discover_proto_files(root: &Path) -> Vec<ProtoFile> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some("proto") {
            files.push(ProtoFile::new(entry.path().to_path_buf()));
        }
    }
    files
}

/// Assemble the include set for one batch
///
/// Every discovered file's parent directory comes first, in discovery order,
/// followed by the configured extras verbatim. Entries are not deduplicated;
/// order is import-resolution priority and the first match wins. Relative
/// extras resolve against the compiler's working directory, which is the
/// project root.
pub fn include_paths(files: &[ProtoFile], config: &Config) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = files.iter().map(|f| f.output_dir.clone()).collect();
    paths.extend(config.extra_include_paths.iter().cloned());
    paths
}
