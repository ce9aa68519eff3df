//! Compiler and plugin location, with fallback search over the packages directory

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Config, PerOsPaths};
use crate::paths::absolutize;
use crate::platform::Platform;

/// Distribution name prefix that ships the primary compiler
const PRIMARY_PREFIX: &str = "Google.Protobuf.Tools";
/// Distribution name prefix that ships the codegen plugin alongside the compiler
const PLUGIN_PREFIX: &str = "Grpc.Tools";

/// Outcome of locating the compiler for one platform
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedToolchain),
    /// Platform has no known toolchain layout
    Unsupported,
    /// Neither the configured path nor the fallback search found a compiler
    Missing,
}

/// A usable compiler location, plus the plugin when one is configured
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToolchain {
    pub protoc: PathBuf,
    pub plugin: Option<PathBuf>,
    /// Set when the fallback search rewrote configured paths; the caller
    /// decides whether to persist it
    pub updated_config: Option<Config>,
}

/// Locate the compiler for `platform` without mutating `config`
///
/// The configured path wins when it exists. Otherwise the packages directory
/// is scanned for known distribution directories and the best candidate's
/// layout is written into a rewritten copy of the configuration.
pub fn resolve(config: &Config, project_root: &Path, platform: Platform) -> Resolution {
    let Some(subdir) = platform.tools_subdir() else {
        return Resolution::Unsupported;
    };

    if let Some(configured) = config.protoc.for_platform(platform) {
        let candidate = absolutize(project_root, Path::new(configured));
        if candidate.is_file() {
            let plugin = config
                .grpc_plugin
                .for_platform(platform)
                .map(|p| absolutize(project_root, Path::new(p)));
            return Resolution::Resolved(ResolvedToolchain {
                protoc: candidate,
                plugin,
                updated_config: None,
            });
        }
        debug!("Configured compiler {} not found, scanning packages", candidate.display());
    }

    fallback_scan(config, project_root, platform, subdir)
}

fn fallback_scan(
    config: &Config,
    project_root: &Path,
    platform: Platform,
    subdir: &str,
) -> Resolution {
    let packages_root = absolutize(project_root, &config.packages_dir);
    let Ok(entries) = fs::read_dir(&packages_root) else {
        return Resolution::Missing;
    };

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(PRIMARY_PREFIX) || name.starts_with(PLUGIN_PREFIX) {
            candidates.push((name, path));
        }
    }
    // Plain string order on purpose: "...Tools.3.9.0" outranks "...Tools.3.10.0".
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (name, dir) in &candidates {
        let protoc = dir
            .join("tools")
            .join(subdir)
            .join(platform.executable_name("protoc"));
        if !protoc.is_file() {
            continue;
        }

        debug!("Fallback search selected distribution {name}");
        let updated = rewrite_config(config, name, &candidates);
        let plugin = updated
            .grpc_plugin
            .for_platform(platform)
            .map(|p| absolutize(project_root, Path::new(p)));
        return Resolution::Resolved(ResolvedToolchain {
            protoc,
            plugin,
            updated_config: Some(updated),
        });
    }

    Resolution::Missing
}

/// Point the per-OS paths at the winning distribution and swap the stale
/// include entries for the winner's tools directory
fn rewrite_config(config: &Config, winner: &str, scanned: &[(String, PathBuf)]) -> Config {
    let winner_root = config.packages_dir.join(winner);
    let mut updated = config.clone();

    updated.protoc = PerOsPaths::for_distribution(&winner_root, "protoc");
    if winner.starts_with(PLUGIN_PREFIX) {
        let plugin_binary = format!("grpc_{}_plugin", config.lang);
        updated.grpc_plugin = PerOsPaths::for_distribution(&winner_root, &plugin_binary);
    }

    let scanned_roots: Vec<PathBuf> = scanned
        .iter()
        .map(|(name, _)| config.packages_dir.join(name))
        .collect();
    updated
        .extra_include_paths
        .retain(|entry| !scanned_roots.iter().any(|root| entry.starts_with(root)));
    updated.extra_include_paths.push(winner_root.join("tools"));

    updated
}
