//! Operating system family resolution for toolchain lookups

/// OS families that have a mapped toolchain layout
///
/// `Unsupported` is a first-class variant: consumers skip compilation for it
/// instead of treating platform resolution as infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Unsupported,
}

impl Platform {
    /// Resolve the platform this process is running on
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unsupported
        }
    }

    /// Per-OS binary directory inside a tools distribution (e.g. `windows_x64`)
    pub fn tools_subdir(self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("windows_x64"),
            Platform::Linux => Some("linux_x64"),
            Platform::MacOs => Some("macosx_x64"),
            Platform::Unsupported => None,
        }
    }

    /// Append the platform's executable suffix to a bare binary name
    pub fn executable_name(self, base: &str) -> String {
        match self {
            Platform::Windows => format!("{base}.exe"),
            _ => base.to_string(),
        }
    }

    pub fn is_supported(self) -> bool {
        self != Platform::Unsupported
    }
}
