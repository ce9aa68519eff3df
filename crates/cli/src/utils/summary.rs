//! Batch summary reporting and config persistence shared by the commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use protowatch_core::{BatchSummary, ProtoRunner, CONFIG_FILE_NAMES};

/// Write the runner's rewritten configuration back to where it was loaded
/// from, or to a fresh file at the project root when none existed
pub fn persist_rewritten_config(
    summary: &BatchSummary,
    runner: &ProtoRunner,
    config_path: Option<&Path>,
) -> Result<()> {
    if !summary.config_rewritten {
        return Ok(());
    }

    let target = match config_path {
        Some(path) => path.to_path_buf(),
        None => runner.project_root().join(CONFIG_FILE_NAMES[0]),
    };
    runner
        .config()
        .save_to_file(&target)
        .with_context(|| format!("Failed to persist config to {}", target.display()))?;
    info!("Saved resolved toolchain paths to {}", target.display());
    Ok(())
}

/// Print the batch result and turn failures into a non-zero exit
pub fn report_summary(summary: &BatchSummary) -> Result<()> {
    let skipped = summary.outcomes.len() - summary.attempted_count();
    let marker = if summary.any_failed() { "❌" } else { "✅" };
    println!(
        "{} {} succeeded, {} failed, {} skipped",
        marker,
        summary.succeeded_count(),
        summary.failed_count(),
        skipped
    );

    if summary.any_failed() {
        bail!("{} compilation(s) failed", summary.failed_count());
    }
    Ok(())
}
