//! Error types for the minter

use std::path::PathBuf;
use thiserror::Error;

/// Which stage of the run an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid secret key, bad configuration values
    Configuration,
    /// Balance query, airdrop or confirmation failures
    Network,
    /// Unreadable file or storage failure
    Upload,
    /// Instruction build failure or on-chain rejection of the mint
    MintSubmission,
}

#[derive(Error, Debug)]
pub enum MinterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter '{parameter}': got '{value}', expected '{expected}'")]
    InvalidParameter {
        parameter: String,
        value: String,
        expected: String,
    },

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction {signature} expired: block height passed {last_valid_block_height} before confirmation")]
    ConfirmationExpired {
        signature: String,
        last_valid_block_height: u64,
    },

    #[error("Airdrop transaction {signature} failed: {reason}")]
    AirdropFailed { signature: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Math overflow: {0}")]
    MathOverflow(String),

    #[error("Mint error: {0}")]
    Mint(String),
}

impl MinterError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, value: &str, expected: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::InvalidParameter { .. } | Self::InvalidSecretKey(_) => {
                ErrorCategory::Configuration
            }
            Self::Rpc(_) | Self::ConfirmationExpired { .. } | Self::AirdropFailed { .. } => {
                ErrorCategory::Network
            }
            Self::ReadFile { .. } | Self::Upload(_) | Self::Serialization(_) => {
                ErrorCategory::Upload
            }
            Self::MathOverflow(_) | Self::Mint(_) => ErrorCategory::MintSubmission,
        }
    }
}

impl From<solana_client::client_error::ClientError> for MinterError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        MinterError::Rpc(err.to_string())
    }
}

impl From<serde_json::Error> for MinterError {
    fn from(err: serde_json::Error) -> Self {
        MinterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MinterError {
    fn from(err: toml::de::Error) -> Self {
        MinterError::Config(err.to_string())
    }
}

pub type MinterResult<T> = Result<T, MinterError>;
