pub mod build;
pub mod compile;
pub mod init;
pub mod watch;

pub use build::build_command;
pub use compile::compile_command;
pub use init::init_command;
pub use watch::watch_command;
