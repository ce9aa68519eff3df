//! Single-file compile driver

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::{
    command::build_invocation,
    config::Config,
    toolchain::ResolvedToolchain,
    types::{CompileOutcome, CompileStatus, ProtoFile, SkipReason},
};

/// Compile one source file and classify the result.
///
/// Never panics and never aborts the batch: launch failures and non-zero
/// exits become outcomes for the caller to aggregate. Compiler stderr with a
/// zero exit is a success with the diagnostic logged.
pub fn compile(
    source: &Path,
    include_paths: &[PathBuf],
    toolchain: &ResolvedToolchain,
    config: &Config,
    project_root: &Path,
) -> CompileOutcome {
    if source.extension().and_then(|e| e.to_str()) != Some("proto") {
        return CompileOutcome::skipped(SkipReason::NotProtoFile);
    }

    let file = ProtoFile::new(source.to_path_buf());
    let command = build_invocation(&file, include_paths, toolchain, config, project_root);

    if config.log_standard {
        info!("Compiling {}", command.to_shell_command());
    }

    let output = match command.run() {
        Ok(output) => output,
        Err(err) => {
            error!("Could not launch compiler for {}: {err}", file.file_name());
            return CompileOutcome {
                status: CompileStatus::LaunchFailed(err.to_string()),
                stdout: String::new(),
                stderr: String::new(),
            };
        }
    };

    if config.log_standard && !output.stdout.is_empty() {
        info!("{}", output.stdout.trim_end());
    }
    if config.log_errors && !output.stderr.is_empty() {
        error!("{}", output.stderr.trim_end());
    }

    let status = if output.status.success() {
        if config.log_standard {
            info!("Compiled {}", file.file_name());
        }
        CompileStatus::Succeeded
    } else {
        CompileStatus::Failed(output.status.code())
    };

    CompileOutcome {
        status,
        stdout: output.stdout,
        stderr: output.stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn toolchain(protoc: PathBuf) -> ResolvedToolchain {
        ResolvedToolchain {
            protoc,
            plugin: None,
            updated_config: None,
        }
    }

    #[cfg(unix)]
    fn stub_compiler(dir: &Path, script_body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("protoc");
        fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_non_proto_candidate_is_skipped_without_spawn() {
        let outcome = compile(
            Path::new("/project/notes.txt"),
            &[],
            &toolchain(PathBuf::from("/definitely/not/a/real/compiler")),
            &Config::default(),
            Path::new("/project"),
        );
        assert_eq!(outcome.status, CompileStatus::Skipped(SkipReason::NotProtoFile));
        assert!(!outcome.attempted());
    }

    #[test]
    fn test_launch_failure_becomes_outcome() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("user.proto");
        fs::write(&source, "syntax = \"proto3\";").unwrap();

        let outcome = compile(
            &source,
            &[],
            &toolchain(PathBuf::from("/definitely/not/a/real/compiler")),
            &Config::default(),
            dir.path(),
        );
        assert!(matches!(outcome.status, CompileStatus::LaunchFailed(_)));
        assert!(outcome.attempted());
        assert!(!outcome.succeeded());
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_with_stderr_is_still_success() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("user.proto");
        fs::write(&source, "syntax = \"proto3\";").unwrap();
        let protoc = stub_compiler(dir.path(), "echo warning: deprecated field 1>&2; exit 0");

        let outcome = compile(&source, &[], &toolchain(protoc), &Config::default(), dir.path());
        assert_eq!(outcome.status, CompileStatus::Succeeded);
        assert!(outcome.stderr.contains("deprecated field"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_surfaces_the_code() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("user.proto");
        fs::write(&source, "syntax = \"proto3\";").unwrap();
        let protoc = stub_compiler(dir.path(), "echo user.proto: parse error 1>&2; exit 1");

        let outcome = compile(&source, &[], &toolchain(protoc), &Config::default(), dir.path());
        assert_eq!(outcome.status, CompileStatus::Failed(Some(1)));
        assert!(outcome.attempted());
        assert!(!outcome.succeeded());
    }
}
