//! Argument assembly for one compiler invocation

use std::path::{Path, PathBuf};

use crate::{command::ProtocCommand, config::Config, toolchain::ResolvedToolchain, types::ProtoFile};

/// Build the compiler invocation for a single source file.
///
/// Argument order is part of the compiler contract: source path first, the
/// language output flag, every include path in priority order, then the
/// plugin pair when a plugin is resolved. The plugin flags use the attached
/// `=` form; the rest are separate arguments.
pub fn build_invocation(
    file: &ProtoFile,
    include_paths: &[PathBuf],
    toolchain: &ResolvedToolchain,
    config: &Config,
    project_root: &Path,
) -> ProtocCommand {
    let mut args = vec![file.source.to_string_lossy().into_owned()];

    // Generated code lands next to the source
    args.push(format!("--{}_out", config.lang));
    args.push(file.output_dir.to_string_lossy().into_owned());

    // Include paths, order preserved
    for include in include_paths {
        args.push("--proto_path".to_string());
        args.push(include.to_string_lossy().into_owned());
    }

    // Plugin pair, only when a plugin is resolved
    if let Some(plugin) = &toolchain.plugin {
        args.push(format!("--grpc_out={}", file.output_dir.display()));
        args.push(format!("--plugin=protoc-gen-grpc={}", plugin.display()));
    }

    ProtocCommand {
        program: toolchain.protoc.clone(),
        args,
        working_dir: project_root.to_path_buf(),
    }
}
