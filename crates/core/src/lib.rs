//! protowatch - compiles interface-definition files by driving an external compiler
//!
//! This crate provides functionality to:
//! - Discover `.proto` files in a project and assemble their include paths
//! - Locate the platform-specific compiler and gRPC plugin, with a fallback
//!   search over vendored tool distributions
//! - Run the compiler per file, capturing output without deadlocking
//! - Coalesce change batches into at most one refresh signal each
pub mod command;
pub mod config;
pub mod error;
pub mod paths;
pub mod platform;
pub mod refresh;
pub mod runner;
pub mod scanner;
pub mod toolchain;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use command::{ProcessOutput, ProtocCommand};
pub use config::{Config, PerOsPaths, CONFIG_FILE_NAMES};
pub use platform::Platform;
pub use refresh::{NullRefresh, RefreshHandler};
pub use runner::ProtoRunner;
pub use toolchain::{Resolution, ResolvedToolchain};
