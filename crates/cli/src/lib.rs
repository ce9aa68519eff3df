pub mod cli;
pub mod commands;
pub mod refresh;
pub mod utils;

// Re-export commonly used items
pub use cli::{Cli, Commands, CommonArgs};
pub use refresh::CommandRefresh;
