use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use protowatch_core::Config;

use crate::commands::{build_command, compile_command, init_command, watch_command};

#[derive(Parser, Debug)]
#[command(name = "protowatch")]
#[command(version, about = "Compiles .proto files by driving protoc", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recompile every .proto file in the project
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        common: CommonArgs,

        /// Print the compiler commands without executing them
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Compile one batch of changed paths
    #[command(visible_alias = "c")]
    Compile {
        /// Changed paths, relative to the project root
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,

        /// Print the compiler commands without executing them
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Watch the project and compile .proto files as they change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Write a default configuration file
    Init {
        #[command(flatten)]
        common: CommonArgs,

        /// Force overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Explicit configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    /// The project root all relative paths resolve against
    pub fn project_root(&self) -> Result<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to get current directory")?,
        };
        root.canonicalize()
            .with_context(|| format!("Failed to canonicalize project root {}", root.display()))
    }

    /// Load the configuration, remembering where it came from so a rewritten
    /// copy can be persisted to the same place
    pub fn load_config(&self, project_root: &Path) -> Result<(Config, Option<PathBuf>)> {
        if let Some(path) = &self.config {
            let config = Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            return Ok((config, Some(path.clone())));
        }

        match Config::find_config_file(project_root) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let config = Config::load_from_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                Ok((config, Some(path)))
            }
            None => {
                debug!("No config file found, using defaults");
                Ok((Config::default(), None))
            }
        }
    }
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Build { common, dry_run } => build_command(&common, dry_run),
            Commands::Compile {
                paths,
                common,
                dry_run,
            } => compile_command(&common, &paths, dry_run),
            Commands::Watch { common } => watch_command(&common),
            Commands::Init { common, force } => init_command(&common, force),
        }
    }
}
