use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use protowatch_core::{ProtoRunner, RefreshHandler};

use crate::cli::CommonArgs;
use crate::refresh::CommandRefresh;
use crate::utils::{persist_rewritten_config, report_summary};

/// Quiet window before a group of filesystem events becomes one batch
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

pub fn watch_command(common: &CommonArgs) -> Result<()> {
    let project_root = common.project_root()?;
    let (config, config_path) = common.load_config(&project_root)?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<notify::Event>| {
            if let Ok(event) = result {
                let _ = tx.send(event);
            }
        },
        notify::Config::default(),
    )
    .context("Failed to create filesystem watcher")?;
    watcher
        .watch(&project_root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", project_root.display()))?;

    println!("👀 Watching {} (Ctrl-C to stop)", project_root.display());

    let mut refresh = CommandRefresh::new(config.refresh_command.clone());
    let mut runner = ProtoRunner::new(project_root, config);

    // One iteration per batch: block for the first event, then drain the
    // quiet window so a save storm becomes a single compile pass.
    while let Ok(first) = rx.recv() {
        let mut batch = Vec::new();
        collect_changed_paths(&first, &mut batch);
        while let Ok(event) = rx.recv_timeout(DEBOUNCE_WINDOW) {
            collect_changed_paths(&event, &mut batch);
        }

        dedup_in_order(&mut batch);
        if batch.is_empty() {
            continue;
        }

        debug!("Change batch of {} path(s)", batch.len());
        process_batch(&mut runner, &batch, &mut refresh, config_path.as_deref());
    }

    Ok(())
}

/// One compile pass over a debounced batch. Nothing in here may stop the
/// watcher: a failed config write is logged and compile failures surface
/// through the summary line only.
fn process_batch(
    runner: &mut ProtoRunner,
    batch: &[PathBuf],
    refresh: &mut dyn RefreshHandler,
    config_path: Option<&Path>,
) {
    let summary = runner.compile_changed(batch, refresh);
    if let Err(err) = persist_rewritten_config(&summary, runner, config_path) {
        warn!("Could not persist rewritten config: {err:#}");
    }
    if summary.any_attempted() {
        let _ = report_summary(&summary);
    }
}

/// Keep created and content-modified paths. A rename contributes only its
/// destination; removals and metadata-only changes are not compile triggers.
fn collect_changed_paths(event: &notify::Event, batch: &mut Vec<PathBuf>) {
    match event.kind {
        EventKind::Create(_) => batch.extend(event.paths.iter().cloned()),
        EventKind::Modify(ModifyKind::Metadata(_)) => {}
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => {
            // The destination is listed last; any earlier path is the name
            // the file no longer has.
            if let Some(destination) = event.paths.last() {
                batch.push(destination.clone());
            }
        }
        EventKind::Modify(ModifyKind::Name(_)) => {}
        EventKind::Modify(_) => batch.extend(event.paths.iter().cloned()),
        _ => {}
    }
}

fn dedup_in_order(batch: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    batch.retain(|path| seen.insert(path.clone()));
}
