// CLI for minting a fungible token with metadata
//
// Loads the configuration, funds the wallet from the faucet when needed,
// uploads the token assets and submits the mint.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fungible-minter")]
#[command(about = "Mint a fungible token with on-chain metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the minter configuration file
    #[arg(short, long, default_value = "minter.toml")]
    config: String,

    /// RPC URL or cluster name, overrides the configuration file
    #[arg(long)]
    rpc_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fund the wallet, upload the assets and mint the token
    Launch(commands::launch::LaunchCmd),

    /// Write an example configuration file
    InitConfig(commands::init_config::InitConfigCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    match cli.command.unwrap_or(Commands::Launch(Default::default())) {
        Commands::Launch(cmd) => {
            commands::launch::execute(cmd, &cli.config, cli.rpc_url.as_deref()).await
        }
        Commands::InitConfig(cmd) => commands::init_config::execute(cmd),
    }
}
