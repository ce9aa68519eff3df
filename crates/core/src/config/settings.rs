use crate::{
    error::{Error, Result},
    platform::Platform,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names probed when walking up from the project root
pub const CONFIG_FILE_NAMES: [&str; 2] = [".protowatch.json", "protowatch.json"];

/// Persisted compiler preferences
///
/// Loaded once per invocation and passed explicitly; nothing in the crate holds
/// a global instance. The toolchain fallback search returns a rewritten copy
/// instead of mutating the loaded value, and the caller decides whether to
/// persist it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Master switch for the incremental path; the explicit full rebuild
    /// ignores it
    pub enabled: bool,
    /// Log the constructed command line, compiler stdout, and per-file
    /// confirmations
    pub log_standard: bool,
    /// Log non-empty compiler stderr at error level
    pub log_errors: bool,
    /// Codegen target language; selects the `--<lang>_out` flag and the
    /// plugin binary name
    pub lang: String,
    /// Per-OS path to the protoc executable, relative to the project root
    pub protoc: PerOsPaths,
    /// Per-OS path to the gRPC codegen plugin; empty entries suppress the
    /// plugin flags entirely
    pub grpc_plugin: PerOsPaths,
    /// Extra include directories appended after the discovered ones,
    /// in configured order
    pub extra_include_paths: Vec<PathBuf>,
    /// Directory scanned by the toolchain fallback search
    pub packages_dir: PathBuf,
    /// Command spawned once per refresh signal, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_command: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        let tools = "Packages/Google.Protobuf.Tools.3.22.4/tools";
        Self {
            enabled: true,
            log_standard: false,
            log_errors: true,
            lang: "csharp".to_string(),
            protoc: PerOsPaths {
                windows: format!("{tools}/windows_x64/protoc.exe"),
                linux: format!("{tools}/linux_x64/protoc"),
                macos: format!("{tools}/macosx_x64/protoc"),
            },
            grpc_plugin: PerOsPaths::default(),
            extra_include_paths: vec![PathBuf::from(tools)],
            packages_dir: PathBuf::from("Packages"),
            refresh_command: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a config file
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}

/// One executable path per OS family
///
/// Entries are plain strings so the serialized form stays editable by hand;
/// an empty or whitespace-only entry means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PerOsPaths {
    pub windows: String,
    pub linux: String,
    pub macos: String,
}

impl PerOsPaths {
    /// The entry for `platform`, or `None` for an unsupported platform or an
    /// unset entry
    pub fn for_platform(&self, platform: Platform) -> Option<&str> {
        let path = match platform {
            Platform::Windows => &self.windows,
            Platform::Linux => &self.linux,
            Platform::MacOs => &self.macos,
            Platform::Unsupported => return None,
        };
        let trimmed = path.trim();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }

    /// Build the full per-OS path set for a binary inside a tools distribution
    /// directory (`<dist>/tools/<os_subdir>/<binary>[.exe]`)
    pub fn for_distribution(dist: &Path, binary: &str) -> Self {
        Self {
            windows: Self::distribution_entry(dist, Platform::Windows, binary),
            linux: Self::distribution_entry(dist, Platform::Linux, binary),
            macos: Self::distribution_entry(dist, Platform::MacOs, binary),
        }
    }

    fn distribution_entry(dist: &Path, platform: Platform, binary: &str) -> String {
        let Some(subdir) = platform.tools_subdir() else {
            return String::new();
        };
        dist.join("tools")
            .join(subdir)
            .join(platform.executable_name(binary))
            .to_string_lossy()
            .into_owned()
    }
}
