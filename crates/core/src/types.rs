//! Shared types for compile outcomes and batch summaries

use std::path::PathBuf;

/// A discovered interface-definition file and where its generated code lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoFile {
    pub source: PathBuf,
    /// Generated code goes next to the source file
    pub output_dir: PathBuf,
}

impl ProtoFile {
    pub fn new(source: PathBuf) -> Self {
        let output_dir = source
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        Self { source, output_dir }
    }

    /// File name for log lines
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Why a candidate was skipped without spawning the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Candidate does not carry the `.proto` extension
    NotProtoFile,
    /// No usable compiler for this platform or configuration
    CompilerUnavailable,
    /// Candidate lives inside the vendored packages directory
    InsideDistribution,
}

/// Terminal state of a single compile attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileStatus {
    Skipped(SkipReason),
    Succeeded,
    /// Compiler ran and exited non-zero; the code is absent when the process
    /// was killed by a signal
    Failed(Option<i32>),
    /// Compiler process could not be started at all
    LaunchFailed(String),
}

/// Result of one compile attempt, with the captured compiler output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    pub status: CompileStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CompileOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            status: CompileStatus::Skipped(reason),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Whether a compiler launch was attempted for this candidate
    pub fn attempted(&self) -> bool {
        !matches!(self.status, CompileStatus::Skipped(_))
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, CompileStatus::Succeeded)
    }
}

/// Aggregate result of one batch, incremental or full rebuild
///
/// Outcomes keep candidate order. Callers inspect this instead of any shared
/// mutable flag.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<(PathBuf, CompileOutcome)>,
    /// Whether the post-batch refresh signal fired
    pub refreshed: bool,
    /// Whether the toolchain fallback rewrote the configuration this batch
    pub config_rewritten: bool,
}

impl BatchSummary {
    pub fn attempted_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.attempted()).count()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.attempted() && !o.succeeded())
            .count()
    }

    pub fn any_attempted(&self) -> bool {
        self.outcomes.iter().any(|(_, o)| o.attempted())
    }

    pub fn any_failed(&self) -> bool {
        self.failed_count() > 0
    }
}
