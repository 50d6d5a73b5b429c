//! Tops up the paying identity from the faucet when its balance is low

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::client::{BalanceSource, FaucetSource};
use crate::core::{MinterResult, LAMPORTS_PER_SOL};

/// Outcome of a funding check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingReport {
    /// Balance before any airdrop
    pub initial_balance: u64,
    /// Balance after the guard finished
    pub final_balance: u64,
    /// Signature of the airdrop, if one was needed
    pub airdrop: Option<Signature>,
}

impl FundingReport {
    pub fn airdropped(&self) -> bool {
        self.airdrop.is_some()
    }
}

pub struct FundingGuard<'a> {
    balances: &'a dyn BalanceSource,
    faucet: &'a dyn FaucetSource,
    threshold_lamports: u64,
    airdrop_lamports: u64,
}

impl<'a> FundingGuard<'a> {
    pub fn new(
        balances: &'a dyn BalanceSource,
        faucet: &'a dyn FaucetSource,
        threshold_lamports: u64,
        airdrop_lamports: u64,
    ) -> Self {
        Self {
            balances,
            faucet,
            threshold_lamports,
            airdrop_lamports,
        }
    }

    /// Request an airdrop when `address` holds less than the threshold and
    /// wait for it to confirm. Balances at or above the threshold are left alone.
    pub async fn ensure_funded(&self, address: &Pubkey) -> MinterResult<FundingReport> {
        let initial_balance = self.balances.get_balance(address).await?;
        log::info!("Current balance: {} SOL", lamports_to_sol(initial_balance));

        if initial_balance >= self.threshold_lamports {
            return Ok(FundingReport {
                initial_balance,
                final_balance: initial_balance,
                airdrop: None,
            });
        }

        log::info!("Balance low. Requesting airdrop...");
        let signature = self
            .faucet
            .request_airdrop(address, self.airdrop_lamports)
            .await?;
        self.faucet.confirm_airdrop(&signature).await?;

        let final_balance = self.balances.get_balance(address).await?;
        log::info!(
            "New balance after airdrop: {} SOL",
            lamports_to_sol(final_balance)
        );

        Ok(FundingReport {
            initial_balance,
            final_balance,
            airdrop: Some(signature),
        })
    }
}

/// Lamports expressed in SOL for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
