//! Deterministic stand-ins for the chain and the storage backend
//!
//! Used by the unit tests and the integration tests under `tests/`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

use crate::client::{BalanceSource, FaucetSource, TransactionSubmitter};
use crate::core::{MinterError, MinterResult};
use crate::storage::{StorageFile, Uploader};

/// A transaction handed to [`FakeChain`]
#[derive(Debug, Clone)]
pub struct Submission {
    pub instructions: Vec<Instruction>,
    pub payer: Pubkey,
    /// Additional signers, payer excluded
    pub signers: Vec<Pubkey>,
    pub signature: Signature,
}

/// In-memory chain with a single balance and call counters
pub struct FakeChain {
    balance: Mutex<u64>,
    pending_airdrop: Mutex<u64>,
    airdrop_requests: AtomicUsize,
    confirmations: AtomicUsize,
    balance_queries: AtomicUsize,
    signatures_issued: AtomicUsize,
    submissions: Mutex<Vec<Submission>>,
    fail_balance: bool,
    fail_confirmation: bool,
    reject_transactions: bool,
}

impl FakeChain {
    pub fn with_balance(lamports: u64) -> Self {
        Self {
            balance: Mutex::new(lamports),
            pending_airdrop: Mutex::new(0),
            airdrop_requests: AtomicUsize::new(0),
            confirmations: AtomicUsize::new(0),
            balance_queries: AtomicUsize::new(0),
            signatures_issued: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            fail_balance: false,
            fail_confirmation: false,
            reject_transactions: false,
        }
    }

    /// Balance queries fail with an RPC error
    pub fn failing_balance(mut self) -> Self {
        self.fail_balance = true;
        self
    }

    /// Airdrops never confirm
    pub fn failing_confirmation(mut self) -> Self {
        self.fail_confirmation = true;
        self
    }

    /// Every submitted transaction is rejected
    pub fn rejecting_transactions(mut self) -> Self {
        self.reject_transactions = true;
        self
    }

    pub fn airdrop_requests(&self) -> usize {
        self.airdrop_requests.load(Ordering::SeqCst)
    }

    pub fn confirmations(&self) -> usize {
        self.confirmations.load(Ordering::SeqCst)
    }

    pub fn balance_queries(&self) -> usize {
        self.balance_queries.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .map(|submissions| submissions.clone())
            .unwrap_or_default()
    }

    fn next_signature(&self) -> Signature {
        let n = self.signatures_issued.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        Signature::from(bytes)
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MinterResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| MinterError::Rpc("fake chain lock poisoned".to_string()))
}

#[async_trait]
impl BalanceSource for FakeChain {
    async fn get_balance(&self, _address: &Pubkey) -> MinterResult<u64> {
        self.balance_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_balance {
            return Err(MinterError::Rpc("connection refused".to_string()));
        }
        Ok(*locked(&self.balance)?)
    }
}

#[async_trait]
impl FaucetSource for FakeChain {
    async fn request_airdrop(&self, _address: &Pubkey, lamports: u64) -> MinterResult<Signature> {
        self.airdrop_requests.fetch_add(1, Ordering::SeqCst);
        *locked(&self.pending_airdrop)? += lamports;
        Ok(self.next_signature())
    }

    async fn confirm_airdrop(&self, signature: &Signature) -> MinterResult<()> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        if self.fail_confirmation {
            return Err(MinterError::ConfirmationExpired {
                signature: signature.to_string(),
                last_valid_block_height: 0,
            });
        }

        let credited = std::mem::take(&mut *locked(&self.pending_airdrop)?);
        *locked(&self.balance)? += credited;
        Ok(())
    }
}

#[async_trait]
impl TransactionSubmitter for FakeChain {
    async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> MinterResult<Signature> {
        if self.reject_transactions {
            return Err(MinterError::Mint("transaction simulation failed".to_string()));
        }

        let signature = self.next_signature();
        locked(&self.submissions)?.push(Submission {
            instructions: instructions.to_vec(),
            payer: payer.pubkey(),
            signers: signers.iter().map(|signer| signer.pubkey()).collect(),
            signature,
        });
        Ok(signature)
    }
}

/// Uploader that fails, or succeeds without returning a URI
pub struct FailingUploader {
    empty_result: bool,
    calls: AtomicUsize,
}

impl FailingUploader {
    pub fn new() -> Self {
        Self {
            empty_result: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty_result() -> Self {
        Self {
            empty_result: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Uploader for FailingUploader {
    async fn upload(&self, _files: Vec<StorageFile>) -> MinterResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.empty_result {
            Ok(Vec::new())
        } else {
            Err(MinterError::Upload("storage unavailable".to_string()))
        }
    }
}
