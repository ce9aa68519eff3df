//! Dry-run planning: print what would be compiled without spawning anything

use std::path::{Path, PathBuf};

use anyhow::Result;

use protowatch_core::{
    command, paths, scanner, toolchain, Config, Platform, ProtoFile, Resolution,
};

/// Print the compiler invocation for each file the batch would attempt.
///
/// `targets` limits the batch to explicit candidates (the incremental path);
/// `None` plans a full rebuild. The guards mirror the real runs: a disabled
/// config stops an incremental plan but not a full-rebuild one, and
/// incremental candidates are filtered the same way (non-proto and
/// packages-directory paths drop out). A fallback rewrite is used for
/// planning but never persisted here.
pub fn print_planned_commands(
    config: &Config,
    project_root: &Path,
    targets: Option<&[PathBuf]>,
) -> Result<()> {
    if targets.is_some() && !config.enabled {
        println!("Compilation is disabled in the config; nothing would run.");
        return Ok(());
    }

    let toolchain = match toolchain::resolve(config, project_root, Platform::current()) {
        Resolution::Resolved(toolchain) => toolchain,
        Resolution::Unsupported => {
            println!("No compiler layout for this platform; nothing would run.");
            return Ok(());
        }
        Resolution::Missing => {
            println!("Compiler not found; nothing would run.");
            return Ok(());
        }
    };

    let effective = toolchain
        .updated_config
        .clone()
        .unwrap_or_else(|| config.clone());
    let files = scanner::discover_proto_files(project_root);
    let include_paths = scanner::include_paths(&files, &effective);

    match targets {
        Some(candidates) => {
            let packages_root = paths::absolutize(project_root, &effective.packages_dir);
            for candidate in candidates {
                let source = paths::absolutize(project_root, candidate);
                if source.extension().and_then(|e| e.to_str()) != Some("proto") {
                    continue;
                }
                if source.starts_with(&packages_root) {
                    continue;
                }
                let file = ProtoFile::new(source);
                let invocation = command::build_invocation(
                    &file,
                    &include_paths,
                    &toolchain,
                    &effective,
                    project_root,
                );
                println!("{}", invocation.to_shell_command());
            }
        }
        None => {
            for file in &files {
                let invocation = command::build_invocation(
                    file,
                    &include_paths,
                    &toolchain,
                    &effective,
                    project_root,
                );
                println!("{}", invocation.to_shell_command());
            }
        }
    }

    Ok(())
}
