pub mod plan;
pub mod summary;

pub use plan::print_planned_commands;
pub use summary::{persist_rewritten_config, report_summary};
