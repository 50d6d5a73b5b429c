// Launch a token: fund, upload, mint

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use fungible_minter::{
    config::MinterConfig,
    funding::lamports_to_sol,
    pipeline::{LaunchContext, Launcher},
};

use super::utils::{explorer_address_url, explorer_tx_url, info, success};

#[derive(Args, Default)]
pub struct LaunchCmd {
    /// Image uploaded as the token logo
    #[arg(long)]
    image: Option<PathBuf>,

    /// Token name
    #[arg(long)]
    name: Option<String>,

    /// Token symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Token description
    #[arg(long)]
    description: Option<String>,

    /// Decimal places of the mint
    #[arg(long)]
    decimals: Option<u8>,

    /// Initial supply in whole tokens
    #[arg(long)]
    amount: Option<u64>,
}

impl LaunchCmd {
    fn apply(self, config: &mut MinterConfig) {
        if let Some(image) = self.image {
            config.image_path = image;
        }
        if let Some(name) = self.name {
            config.token.name = name;
        }
        if let Some(symbol) = self.symbol {
            config.token.symbol = symbol;
        }
        if let Some(description) = self.description {
            config.token.description = description;
        }
        if let Some(decimals) = self.decimals {
            config.token.decimals = decimals;
        }
        if let Some(amount) = self.amount {
            config.token.amount = amount;
        }
    }
}

fn load_config(path: &str) -> Result<MinterConfig> {
    if Path::new(path).exists() {
        return MinterConfig::load(path).with_context(|| format!("Failed to load {}", path));
    }

    log::warn!("No configuration file at {}, using defaults", path);
    Ok(MinterConfig::default())
}

pub async fn execute(cmd: LaunchCmd, config_path: &str, rpc_url: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(url) = rpc_url {
        config.network_endpoint = url.to_string();
    }
    cmd.apply(&mut config);
    config.apply_env();

    let context = LaunchContext::from_config(&config).context("Failed to connect")?;
    run_launch(config, context).await
}

/// Run the launcher and print the summary; failures are returned, not printed
async fn run_launch(config: MinterConfig, context: LaunchContext) -> Result<()> {
    info(&format!(
        "Minting {} {} ({} decimals) as \"{}\"",
        config.token.amount, config.token.symbol, config.token.decimals, config.token.name
    ));

    let cluster = config.explorer_cluster();
    let launcher = Launcher::new(config, context);
    let report = launcher.run().await.context("Launch failed")?;

    if let Some(airdrop) = report.funding.airdrop {
        info(&format!(
            "Airdrop {} brought balance to {} SOL",
            airdrop,
            lamports_to_sol(report.funding.final_balance)
        ));
    }
    info(&format!("Image URI: {}", report.image_uri));
    info(&format!("Metadata URI: {}", report.metadata_uri));
    success(&format!("Transaction signature: {}", report.mint.signature));
    success(&format!("Mint address: {}", report.mint.mint));
    info(&format!("Token account: {}", report.mint.token_account));

    if let Some(cluster) = cluster {
        info(&explorer_tx_url(&report.mint.signature.to_string(), cluster));
        info(&explorer_address_url(&report.mint.mint.to_string(), cluster));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fungible_minter::{core::LAMPORTS_PER_SOL, testing::FakeChain, MinterError, MockStorage};

    fn fake_context(chain: &Arc<FakeChain>) -> LaunchContext {
        LaunchContext::new(chain.clone(), Arc::new(MockStorage::new()))
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = MinterConfig::default();
        let cmd = LaunchCmd {
            image: Some(PathBuf::from("art/coin.png")),
            symbol: Some("SILV".to_string()),
            decimals: Some(2),
            amount: Some(5),
            ..Default::default()
        };
        cmd.apply(&mut config);

        assert_eq!(config.image_path, PathBuf::from("art/coin.png"));
        assert_eq!(config.token.symbol, "SILV");
        assert_eq!(config.token.decimals, 2);
        assert_eq!(config.token.amount, 5);
        assert_eq!(config.token.name, MinterConfig::default().token.name);
    }

    #[tokio::test]
    async fn test_failed_launch_is_returned_once_with_context() {
        let chain = Arc::new(FakeChain::with_balance(2 * LAMPORTS_PER_SOL));
        let config = MinterConfig::default();

        let err = run_launch(config, fake_context(&chain)).await.unwrap_err();

        let messages: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Launch failed");
        assert!(matches!(
            err.downcast_ref::<MinterError>(),
            Some(MinterError::InvalidSecretKey(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_overrides_rejected_before_network() {
        let chain = Arc::new(FakeChain::with_balance(2 * LAMPORTS_PER_SOL));
        let mut config = MinterConfig::default();
        config.secret_key = Some(solana_sdk::signature::Keypair::new().to_base58_string());
        LaunchCmd {
            symbol: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut config);

        let err = run_launch(config, fake_context(&chain)).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MinterError>(),
            Some(MinterError::InvalidParameter { .. })
        ));
        assert_eq!(chain.balance_queries(), 0);
    }
}
