use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::{Transaction, TransactionError},
};

use super::{BalanceSource, FaucetSource, TransactionSubmitter};
use crate::core::{MinterError, MinterResult, DEFAULT_CONFIRM_POLL_INTERVAL_MS};

/// JSON-RPC backed chain client
pub struct RpcChainClient {
    rpc: Arc<RpcClient>,
    commitment: CommitmentConfig,
    poll_interval: Duration,
}

impl RpcChainClient {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            rpc_url.to_string(),
            commitment,
        ));
        Self {
            rpc,
            commitment,
            poll_interval: Duration::from_millis(DEFAULT_CONFIRM_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Get the RPC client
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the RPC endpoint URL
    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }

    /// Poll an airdrop's status until it lands, fails, or the blockhash
    /// fetched at the start of the wait expires
    async fn wait_for_airdrop(&self, signature: &Signature) -> MinterResult<()> {
        let (blockhash, last_valid_block_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        log::debug!(
            "Confirming {} against blockhash {} (valid until height {})",
            signature,
            blockhash,
            last_valid_block_height
        );

        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, self.commitment)
                .await?;

            if airdrop_landed(signature, status)? {
                return Ok(());
            }

            let block_height = self
                .rpc
                .get_block_height_with_commitment(self.commitment)
                .await?;
            if block_height > last_valid_block_height {
                return Err(MinterError::ConfirmationExpired {
                    signature: signature.to_string(),
                    last_valid_block_height,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// `Ok(true)` once the airdrop landed, `Ok(false)` while it is still pending
fn airdrop_landed(
    signature: &Signature,
    status: Option<Result<(), TransactionError>>,
) -> MinterResult<bool> {
    match status {
        Some(Ok(())) => Ok(true),
        Some(Err(err)) => Err(MinterError::AirdropFailed {
            signature: signature.to_string(),
            reason: err.to_string(),
        }),
        None => Ok(false),
    }
}

#[async_trait]
impl BalanceSource for RpcChainClient {
    async fn get_balance(&self, address: &Pubkey) -> MinterResult<u64> {
        self.rpc
            .get_balance_with_commitment(address, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(|e| {
                log::error!("Failed to fetch balance of {}: {}", address, e);
                MinterError::from(e)
            })
    }
}

#[async_trait]
impl FaucetSource for RpcChainClient {
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> MinterResult<Signature> {
        self.rpc
            .request_airdrop(address, lamports)
            .await
            .map_err(|e| {
                log::error!("Airdrop request for {} failed: {}", address, e);
                MinterError::from(e)
            })
    }

    async fn confirm_airdrop(&self, signature: &Signature) -> MinterResult<()> {
        self.wait_for_airdrop(signature).await.map_err(|e| {
            log::error!("Airdrop {} was not confirmed: {}", signature, e);
            e
        })
    }
}

#[async_trait]
impl TransactionSubmitter for RpcChainClient {
    async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> MinterResult<Signature> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let mut all_signers: Vec<&Keypair> = vec![payer];
        all_signers.extend_from_slice(signers);

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            all_signers.as_slice(),
            recent_blockhash,
        );

        self.rpc
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|e| {
                log::error!("Transaction submission failed: {}", e);
                MinterError::Mint(e.to_string())
            })
    }
}
