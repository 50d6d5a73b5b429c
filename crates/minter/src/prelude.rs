//! Common imports for driving a launch

pub use crate::client::{BalanceSource, FaucetSource, TransactionSubmitter};
pub use crate::config::{MinterConfig, TokenParams};
pub use crate::core::{MinterError, MinterResult};
pub use crate::pipeline::{LaunchContext, Launcher};
pub use crate::storage::Uploader;

pub use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
