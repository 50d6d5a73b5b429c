//! The launch pipeline: identity, funding, uploads, mint
//!
//! Stages run strictly in order and the first failure aborts the run. Nothing
//! is rolled back; an uploaded image stays uploaded if the mint later fails.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use solana_sdk::{pubkey::Pubkey, signer::Signer};

use crate::assets::{AssetUploader, TokenMetadata};
use crate::client::{BalanceSource, FaucetSource, RpcChainClient, TransactionSubmitter};
use crate::config::MinterConfig;
use crate::core::MinterResult;
use crate::funding::{FundingGuard, FundingReport};
use crate::mint::{MintExecutor, MintOutcome, MintRequest};
use crate::storage::{uploader_from_config, Uploader};

/// Capabilities a launch runs against
#[derive(Clone)]
pub struct LaunchContext {
    pub balances: Arc<dyn BalanceSource>,
    pub faucet: Arc<dyn FaucetSource>,
    pub submitter: Arc<dyn TransactionSubmitter>,
    pub uploader: Arc<dyn Uploader>,
}

impl LaunchContext {
    /// Use one chain implementation for every chain capability
    pub fn new<C>(chain: Arc<C>, uploader: Arc<dyn Uploader>) -> Self
    where
        C: BalanceSource + FaucetSource + TransactionSubmitter + 'static,
    {
        Self {
            balances: chain.clone(),
            faucet: chain.clone(),
            submitter: chain,
            uploader,
        }
    }

    /// Connect to the configured RPC endpoint and storage backend
    pub fn from_config(config: &MinterConfig) -> MinterResult<Self> {
        let chain = RpcChainClient::new(&config.rpc_url(), config.commitment_config()?)
            .with_poll_interval(Duration::from_millis(config.confirm_poll_interval_ms));
        log::info!("RPC URL: {}", chain.rpc_url());

        Ok(Self::new(
            Arc::new(chain),
            uploader_from_config(&config.storage),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Start,
    IdentityReady,
    Funded,
    ImageUploaded,
    MetadataUploaded,
    Minted,
    Done,
    Aborted,
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LaunchStage::Start => "start",
            LaunchStage::IdentityReady => "identity-ready",
            LaunchStage::Funded => "funded",
            LaunchStage::ImageUploaded => "image-uploaded",
            LaunchStage::MetadataUploaded => "metadata-uploaded",
            LaunchStage::Minted => "minted",
            LaunchStage::Done => "done",
            LaunchStage::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// Everything a successful launch produced
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub identity: Pubkey,
    pub funding: FundingReport,
    pub image_uri: String,
    pub metadata_uri: String,
    pub mint: MintOutcome,
}

/// A finished run: the stages it went through and its result
#[derive(Debug)]
pub struct LaunchOutcome {
    pub stages: Vec<LaunchStage>,
    pub result: MinterResult<LaunchReport>,
}

impl LaunchOutcome {
    pub fn final_stage(&self) -> LaunchStage {
        self.stages.last().copied().unwrap_or(LaunchStage::Start)
    }
}

struct StageTracker {
    visited: Vec<LaunchStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            visited: vec![LaunchStage::Start],
        }
    }

    fn current(&self) -> LaunchStage {
        self.visited.last().copied().unwrap_or(LaunchStage::Start)
    }

    fn advance(&mut self, next: LaunchStage) {
        log::debug!("Stage {} -> {}", self.current(), next);
        self.visited.push(next);
    }
}

pub struct Launcher {
    config: MinterConfig,
    context: LaunchContext,
}

impl Launcher {
    pub fn new(config: MinterConfig, context: LaunchContext) -> Self {
        Self { config, context }
    }

    pub fn config(&self) -> &MinterConfig {
        &self.config
    }

    /// Run every stage and return the report of the mint
    pub async fn run(&self) -> MinterResult<LaunchReport> {
        self.run_tracked().await.result
    }

    /// Run every stage, recording which ones were reached
    pub async fn run_tracked(&self) -> LaunchOutcome {
        let mut tracker = StageTracker::new();
        let result = self.run_stages(&mut tracker).await;

        match &result {
            Ok(_) => tracker.advance(LaunchStage::Done),
            Err(e) => {
                log::error!("Launch aborted after stage {}: {}", tracker.current(), e);
                tracker.advance(LaunchStage::Aborted);
            }
        }

        LaunchOutcome {
            stages: tracker.visited,
            result,
        }
    }

    async fn run_stages(&self, tracker: &mut StageTracker) -> MinterResult<LaunchReport> {
        self.config.validate()?;
        let identity = self.config.identity().map_err(|e| {
            log::error!("Failed to load identity: {}", e);
            e
        })?;
        log::info!("Identity: {}", identity.pubkey());
        tracker.advance(LaunchStage::IdentityReady);

        let funding = FundingGuard::new(
            self.context.balances.as_ref(),
            self.context.faucet.as_ref(),
            self.config.funding_threshold_lamports,
            self.config.airdrop_lamports,
        )
        .ensure_funded(&identity.pubkey())
        .await?;
        tracker.advance(LaunchStage::Funded);

        let assets = AssetUploader::new(self.context.uploader.as_ref());
        let image_uri = assets.upload_image(&self.config.image_path).await?;
        tracker.advance(LaunchStage::ImageUploaded);

        let token = &self.config.token;
        let metadata = TokenMetadata {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            description: token.description.clone(),
            image: image_uri.clone(),
        };
        let metadata_uri = assets.upload_metadata(&metadata).await?;
        tracker.advance(LaunchStage::MetadataUploaded);

        let request = MintRequest::from_params(token, metadata_uri.clone());
        let mint = MintExecutor::new(self.context.submitter.as_ref())
            .execute(&identity, &request)
            .await?;
        tracker.advance(LaunchStage::Minted);

        Ok(LaunchReport {
            identity: identity.pubkey(),
            funding,
            image_uri,
            metadata_uri,
            mint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(LaunchStage::IdentityReady.to_string(), "identity-ready");
        assert_eq!(LaunchStage::MetadataUploaded.to_string(), "metadata-uploaded");
        assert_eq!(LaunchStage::Aborted.to_string(), "aborted");
    }

    #[test]
    fn test_stage_tracker() {
        let mut tracker = StageTracker::new();
        assert_eq!(tracker.current(), LaunchStage::Start);
        tracker.advance(LaunchStage::IdentityReady);
        tracker.advance(LaunchStage::Aborted);
        assert_eq!(
            tracker.visited,
            vec![
                LaunchStage::Start,
                LaunchStage::IdentityReady,
                LaunchStage::Aborted
            ]
        );
    }
}
