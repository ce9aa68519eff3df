//! Main runner that coordinates toolchain resolution, scanning, and compilation

use crate::{
    command,
    config::Config,
    error::Result,
    paths::absolutize,
    platform::Platform,
    refresh::RefreshHandler,
    scanner,
    toolchain::{self, Resolution, ResolvedToolchain},
    types::{BatchSummary, CompileOutcome, SkipReason},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Drives compilation over one project root with one owned configuration.
///
/// Each entry point processes exactly one batch: the toolchain is resolved
/// once, the project is scanned once, candidates are compiled strictly in
/// sequence, and at most one refresh signal fires at the end. Per-file
/// failures never abort the batch.
pub struct ProtoRunner {
    config: Config,
    project_root: PathBuf,
    platform: Platform,
    config_rewritten: bool,
}

impl ProtoRunner {
    pub fn new(project_root: PathBuf, config: Config) -> Self {
        Self {
            config,
            project_root,
            platform: Platform::current(),
            config_rewritten: false,
        }
    }

    /// Construct by discovering a config file upward from the project root,
    /// falling back to defaults when none exists
    pub fn from_project_root(project_root: PathBuf) -> Result<Self> {
        let config = match Config::find_config_file(&project_root) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Config::load_from_file(&path)?
            }
            None => Config::default(),
        };
        Ok(Self::new(project_root, config))
    }

    /// Override the detected platform, for callers that resolve for another OS
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Compile one batch of changed candidate paths.
    ///
    /// Honors the enabled switch, skips candidates inside the vendored
    /// packages directory, and refreshes only when at least one candidate was
    /// actually attempted.
    pub fn compile_changed(
        &mut self,
        candidates: &[PathBuf],
        refresh: &mut dyn RefreshHandler,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();
        if !self.config.enabled {
            debug!(
                "Compilation disabled, ignoring {} changed path(s)",
                candidates.len()
            );
            return summary;
        }

        let Some(toolchain) = self.resolve_toolchain() else {
            for candidate in candidates {
                summary.outcomes.push((
                    candidate.clone(),
                    CompileOutcome::skipped(SkipReason::CompilerUnavailable),
                ));
            }
            summary.config_rewritten = std::mem::take(&mut self.config_rewritten);
            return summary;
        };

        let files = scanner::discover_proto_files(&self.project_root);
        let include_paths = scanner::include_paths(&files, &self.config);
        let packages_root = absolutize(&self.project_root, &self.config.packages_dir);

        for candidate in candidates {
            let source = absolutize(&self.project_root, candidate);
            let outcome = if source.starts_with(&packages_root) {
                debug!("Skipping {} inside the packages directory", source.display());
                CompileOutcome::skipped(SkipReason::InsideDistribution)
            } else {
                command::compile(
                    &source,
                    &include_paths,
                    &toolchain,
                    &self.config,
                    &self.project_root,
                )
            };
            summary.outcomes.push((candidate.clone(), outcome));
        }

        summary.config_rewritten = std::mem::take(&mut self.config_rewritten);
        if summary.any_attempted() {
            self.log_summary(&summary);
            refresh.refresh();
            summary.refreshed = true;
        }
        summary
    }

    /// Recompile every discovered file.
    ///
    /// This is the explicit "rebuild everything" entry point: it ignores the
    /// enabled switch and applies no packages-directory exclusion, and it
    /// refreshes even when nothing was discovered, as long as a compiler was
    /// resolved.
    pub fn compile_all(&mut self, refresh: &mut dyn RefreshHandler) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let Some(toolchain) = self.resolve_toolchain() else {
            for file in scanner::discover_proto_files(&self.project_root) {
                summary.outcomes.push((
                    file.source,
                    CompileOutcome::skipped(SkipReason::CompilerUnavailable),
                ));
            }
            summary.config_rewritten = std::mem::take(&mut self.config_rewritten);
            return summary;
        };

        if self.config.log_standard {
            info!(
                "Compiling all .proto files under {}",
                self.project_root.display()
            );
        }

        let files = scanner::discover_proto_files(&self.project_root);
        let include_paths = scanner::include_paths(&files, &self.config);

        for file in &files {
            if self.config.log_standard {
                info!("Compiling {}", file.source.display());
            }
            let outcome = command::compile(
                &file.source,
                &include_paths,
                &toolchain,
                &self.config,
                &self.project_root,
            );
            summary.outcomes.push((file.source.clone(), outcome));
        }

        summary.config_rewritten = std::mem::take(&mut self.config_rewritten);
        self.log_summary(&summary);
        refresh.refresh();
        summary.refreshed = true;
        summary
    }

    /// Resolve at most once per batch; a fallback rewrite is adopted
    /// immediately so the next batch takes the configured fast path
    fn resolve_toolchain(&mut self) -> Option<ResolvedToolchain> {
        match toolchain::resolve(&self.config, &self.project_root, self.platform) {
            Resolution::Resolved(mut resolved) => {
                if let Some(updated) = resolved.updated_config.take() {
                    self.config = updated;
                    self.config_rewritten = true;
                }
                Some(resolved)
            }
            Resolution::Unsupported => {
                debug!("No compiler layout for this platform, skipping batch");
                None
            }
            Resolution::Missing => {
                debug!("Compiler not found, skipping batch");
                None
            }
        }
    }

    fn log_summary(&self, summary: &BatchSummary) {
        info!(
            "Batch finished: {} attempted, {} succeeded, {} failed, {} skipped",
            summary.attempted_count(),
            summary.succeeded_count(),
            summary.failed_count(),
            summary.outcomes.len() - summary.attempted_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompileStatus;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingRefresh {
        calls: usize,
    }

    impl RefreshHandler for CountingRefresh {
        fn refresh(&mut self) {
            self.calls += 1;
        }
    }

    fn disabled_config() -> Config {
        Config {
            enabled: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_disabled_incremental_batch_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

        let mut runner = ProtoRunner::new(dir.path().to_path_buf(), disabled_config());
        let mut refresh = CountingRefresh::default();
        let summary = runner.compile_changed(&[PathBuf::from("user.proto")], &mut refresh);

        assert!(summary.outcomes.is_empty());
        assert!(!summary.refreshed);
        assert_eq!(refresh.calls, 0);
    }

    #[test]
    fn test_unresolved_toolchain_skips_every_candidate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

        let mut runner = ProtoRunner::new(dir.path().to_path_buf(), Config::default());
        let mut refresh = CountingRefresh::default();
        let summary = runner.compile_changed(
            &[PathBuf::from("user.proto"), PathBuf::from("order.proto")],
            &mut refresh,
        );

        assert_eq!(summary.outcomes.len(), 2);
        for (_, outcome) in &summary.outcomes {
            assert_eq!(
                outcome.status,
                CompileStatus::Skipped(SkipReason::CompilerUnavailable)
            );
        }
        assert!(!summary.refreshed);
        assert_eq!(refresh.calls, 0);
    }

    #[test]
    fn test_unsupported_platform_attempts_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

        let mut runner = ProtoRunner::new(dir.path().to_path_buf(), Config::default())
            .with_platform(Platform::Unsupported);
        let mut refresh = CountingRefresh::default();
        let summary = runner.compile_changed(&[PathBuf::from("user.proto")], &mut refresh);

        assert_eq!(summary.attempted_count(), 0);
        assert_eq!(refresh.calls, 0);
    }

    #[test]
    fn test_full_rebuild_with_missing_toolchain_skips_discovered_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.proto"), "syntax = \"proto3\";").unwrap();
        fs::write(dir.path().join("b.proto"), "syntax = \"proto3\";").unwrap();

        let mut runner = ProtoRunner::new(dir.path().to_path_buf(), Config::default());
        let mut refresh = CountingRefresh::default();
        let summary = runner.compile_all(&mut refresh);

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.attempted_count(), 0);
        assert!(!summary.refreshed);
        assert_eq!(refresh.calls, 0);
    }

    #[cfg(unix)]
    mod with_stub_compiler {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Lay out a project with a stub compiler at the default configured
        /// location that records each invocation into `invocations.log`
        fn project_with_stub(exit_code: i32) -> TempDir {
            let dir = TempDir::new().unwrap();
            let tools = dir
                .path()
                .join("Packages/Google.Protobuf.Tools.3.22.4/tools/linux_x64");
            fs::create_dir_all(&tools).unwrap();
            let script = format!(
                "#!/bin/sh\necho \"$@\" >> \"{}/invocations.log\"\nexit {exit_code}\n",
                dir.path().display()
            );
            let protoc = tools.join("protoc");
            fs::write(&protoc, script).unwrap();
            fs::set_permissions(&protoc, fs::Permissions::from_mode(0o755)).unwrap();
            dir
        }

        fn invocations(dir: &TempDir) -> Vec<String> {
            fs::read_to_string(dir.path().join("invocations.log"))
                .map(|s| s.lines().map(str::to_string).collect())
                .unwrap_or_default()
        }

        fn runner_for(dir: &TempDir) -> ProtoRunner {
            ProtoRunner::new(dir.path().to_path_buf(), Config::default())
                .with_platform(Platform::Linux)
        }

        #[test]
        fn test_incremental_batch_compiles_each_candidate_once() {
            let dir = project_with_stub(0);
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();
            fs::write(dir.path().join("order.proto"), "syntax = \"proto3\";").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_changed(
                &[PathBuf::from("user.proto"), PathBuf::from("order.proto")],
                &mut refresh,
            );

            assert_eq!(summary.attempted_count(), 2);
            assert_eq!(summary.succeeded_count(), 2);
            assert!(summary.refreshed);
            assert_eq!(refresh.calls, 1);
            assert_eq!(invocations(&dir).len(), 2);
        }

        #[test]
        fn test_incremental_batch_skips_candidates_inside_packages_dir() {
            let dir = project_with_stub(0);
            let vendored = dir.path().join("Packages/Grpc.Tools.2.60.0/sample.proto");
            fs::create_dir_all(vendored.parent().unwrap()).unwrap();
            fs::write(&vendored, "syntax = \"proto3\";").unwrap();
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_changed(
                &[
                    PathBuf::from("Packages/Grpc.Tools.2.60.0/sample.proto"),
                    PathBuf::from("user.proto"),
                ],
                &mut refresh,
            );

            assert_eq!(
                summary.outcomes[0].1.status,
                CompileStatus::Skipped(SkipReason::InsideDistribution)
            );
            assert_eq!(summary.outcomes[1].1.status, CompileStatus::Succeeded);
            assert_eq!(summary.attempted_count(), 1);
            assert_eq!(refresh.calls, 1);
        }

        #[test]
        fn test_non_proto_candidates_do_not_trigger_refresh() {
            let dir = project_with_stub(0);
            fs::write(dir.path().join("readme.md"), "hello").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_changed(&[PathBuf::from("readme.md")], &mut refresh);

            assert_eq!(summary.attempted_count(), 0);
            assert!(!summary.refreshed);
            assert_eq!(refresh.calls, 0);
            assert!(invocations(&dir).is_empty());
        }

        #[test]
        fn test_failed_candidate_does_not_abort_the_batch() {
            let dir = project_with_stub(1);
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();
            fs::write(dir.path().join("order.proto"), "syntax = \"proto3\";").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_changed(
                &[PathBuf::from("user.proto"), PathBuf::from("order.proto")],
                &mut refresh,
            );

            assert_eq!(summary.attempted_count(), 2);
            assert_eq!(summary.failed_count(), 2);
            for (_, outcome) in &summary.outcomes {
                assert_eq!(outcome.status, CompileStatus::Failed(Some(1)));
            }
            // Attempted counts as activity, so the refresh still fires.
            assert_eq!(refresh.calls, 1);
        }

        #[test]
        fn test_full_rebuild_sweeps_everything_including_packages_dir() {
            let dir = project_with_stub(0);
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();
            let vendored = dir.path().join("Packages/Grpc.Tools.2.60.0/sample.proto");
            fs::create_dir_all(vendored.parent().unwrap()).unwrap();
            fs::write(&vendored, "syntax = \"proto3\";").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_all(&mut refresh);

            assert_eq!(summary.attempted_count(), 2);
            assert!(summary.refreshed);
            assert_eq!(refresh.calls, 1);
        }

        #[test]
        fn test_full_rebuild_ignores_the_enabled_switch() {
            let dir = project_with_stub(0);
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

            let mut runner = ProtoRunner::new(dir.path().to_path_buf(), disabled_config())
                .with_platform(Platform::Linux);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_all(&mut refresh);

            assert_eq!(summary.attempted_count(), 1);
            assert_eq!(refresh.calls, 1);
        }

        #[test]
        fn test_full_rebuild_refreshes_even_with_nothing_to_compile() {
            let dir = project_with_stub(0);

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();
            let summary = runner.compile_all(&mut refresh);

            assert!(summary.outcomes.is_empty());
            assert!(summary.refreshed);
            assert_eq!(refresh.calls, 1);
        }

        #[test]
        fn test_fallback_rewrite_is_adopted_and_reported_once() {
            let dir = TempDir::new().unwrap();
            // Compiler lives in a differently-versioned distribution than the
            // configured default, so the first batch goes through the fallback.
            let tools = dir
                .path()
                .join("Packages/Google.Protobuf.Tools.9.9.9/tools/linux_x64");
            fs::create_dir_all(&tools).unwrap();
            fs::write(tools.join("protoc"), "#!/bin/sh\nexit 0\n").unwrap();
            fs::set_permissions(
                tools.join("protoc"),
                fs::Permissions::from_mode(0o755),
            )
            .unwrap();
            fs::write(dir.path().join("user.proto"), "syntax = \"proto3\";").unwrap();

            let mut runner = runner_for(&dir);
            let mut refresh = CountingRefresh::default();

            let first = runner.compile_changed(&[PathBuf::from("user.proto")], &mut refresh);
            assert!(first.config_rewritten);
            assert_eq!(
                runner.config().protoc.linux,
                "Packages/Google.Protobuf.Tools.9.9.9/tools/linux_x64/protoc"
            );

            let second = runner.compile_changed(&[PathBuf::from("user.proto")], &mut refresh);
            assert!(!second.config_rewritten);
        }
    }
}
