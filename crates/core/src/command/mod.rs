//! Compiler command construction and execution

pub mod builder;
pub mod invoke;
pub mod protoc_command;

// Re-export commonly used items
pub use builder::build_invocation;
pub use invoke::compile;
pub use protoc_command::{ProcessOutput, ProtocCommand};
