//! Mint a fungible token with on-chain metadata on a Solana cluster
//!
//! A run funds the paying identity from the faucet when needed, uploads the
//! token image and its metadata document, then creates the mint and its
//! initial supply in a single transaction. Chain access and storage sit
//! behind the capability traits in [`client`] and [`storage`].

pub mod assets;
pub mod client;
pub mod config;
pub mod core;
pub mod funding;
pub mod mint;
pub mod pipeline;
pub mod prelude;
pub mod storage;
pub mod testing;

pub use assets::{AssetUploader, TokenMetadata};
pub use client::{BalanceSource, FaucetSource, RpcChainClient, TransactionSubmitter};
pub use config::{MinterConfig, StorageConfig, TokenParams};
pub use crate::core::{ErrorCategory, MinterError, MinterResult};
pub use funding::{FundingGuard, FundingReport};
pub use mint::{MintExecutor, MintOutcome, MintPlan, MintRequest};
pub use pipeline::{LaunchContext, LaunchOutcome, LaunchReport, LaunchStage, Launcher};
pub use storage::{HttpUploader, MockStorage, StorageFile, Uploader};
