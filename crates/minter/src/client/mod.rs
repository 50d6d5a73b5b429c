//! Chain capabilities consumed by the funding guard and the mint executor
//!
//! Each capability is a narrow trait so a run can be driven by the live RPC
//! client or by the in-memory fakes in [`crate::testing`].

pub mod rpc;

use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};

use crate::core::MinterResult;

pub use rpc::RpcChainClient;

/// Reads account balances
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Balance of `address` in lamports
    async fn get_balance(&self, address: &Pubkey) -> MinterResult<u64>;
}

/// Requests test funds and waits for them to land
#[async_trait]
pub trait FaucetSource: Send + Sync {
    /// Ask the faucet for `lamports`, returning the airdrop signature
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> MinterResult<Signature>;

    /// Block until the airdrop is confirmed or can no longer land
    async fn confirm_airdrop(&self, signature: &Signature) -> MinterResult<()>;
}

/// Signs, submits and confirms transactions
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Build one transaction paid by `payer`, sign it with `payer` and
    /// `signers`, send it and wait for confirmation
    async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> MinterResult<Signature>;
}
