// Example configuration generation

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use fungible_minter::config::create_example_config;

use super::utils::{info, success};

#[derive(Args)]
pub struct InitConfigCmd {
    /// Where to write the configuration
    #[arg(short, long, default_value = "minter.toml")]
    output: String,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn execute(cmd: InitConfigCmd) -> Result<()> {
    if Path::new(&cmd.output).exists() && !cmd.force {
        anyhow::bail!("{} already exists, pass --force to overwrite", cmd.output);
    }

    create_example_config(&cmd.output)
        .with_context(|| format!("Failed to write config to {}", cmd.output))?;

    success(&format!("Configuration saved to: {}", cmd.output));
    info("Set PRIVATE_KEY in the environment or a .env file before launching");
    Ok(())
}
