//! Configuration management for protowatch

mod settings;

// Re-export main types
pub use settings::{Config, PerOsPaths, CONFIG_FILE_NAMES};
