use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use protowatch_core::ProtoRunner;

use crate::cli::CommonArgs;
use crate::refresh::CommandRefresh;
use crate::utils::{persist_rewritten_config, print_planned_commands, report_summary};

pub fn compile_command(common: &CommonArgs, paths: &[PathBuf], dry_run: bool) -> Result<()> {
    let project_root = common.project_root()?;
    let (config, config_path) = common.load_config(&project_root)?;

    if dry_run {
        return print_planned_commands(&config, &project_root, Some(paths));
    }

    debug!("Compiling a batch of {} changed path(s)", paths.len());
    let mut refresh = CommandRefresh::new(config.refresh_command.clone());
    let mut runner = ProtoRunner::new(project_root, config);
    let summary = runner.compile_changed(paths, &mut refresh);

    persist_rewritten_config(&summary, &runner, config_path.as_deref())?;
    report_summary(&summary)
}
