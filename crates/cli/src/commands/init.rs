use anyhow::{bail, Context, Result};

use protowatch_core::{Config, CONFIG_FILE_NAMES};

use crate::cli::CommonArgs;

pub fn init_command(common: &CommonArgs, force: bool) -> Result<()> {
    let project_root = common.project_root()?;
    let path = match &common.config {
        Some(path) => path.clone(),
        None => project_root.join(CONFIG_FILE_NAMES[0]),
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {}", path.display());
    println!("   Edit the per-OS protoc paths if your toolchain lives elsewhere.");
    Ok(())
}
