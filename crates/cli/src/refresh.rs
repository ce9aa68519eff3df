//! Refresh handling for a standalone tool

use std::process::Command;

use protowatch_core::RefreshHandler;
use tracing::{info, warn};

/// Logs each refresh signal and runs the configured refresh command, if any.
///
/// The command stands in for the host rescan the signal would trigger inside
/// an editor. Its stdio is inherited; a failure is logged and swallowed, so a
/// broken hook can never fail the batch.
pub struct CommandRefresh {
    command: Option<Vec<String>>,
}

impl CommandRefresh {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self { command }
    }
}

impl RefreshHandler for CommandRefresh {
    fn refresh(&mut self) {
        info!("Refreshing generated sources");
        let Some(parts) = &self.command else {
            return;
        };
        let Some((program, args)) = parts.split_first() else {
            return;
        };

        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!("Refresh command exited with {status}"),
            Err(err) => warn!("Refresh command failed to start: {err}"),
        }
    }
}
