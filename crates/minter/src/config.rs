use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, signature::Keypair};

use crate::core::{
    MinterError, MinterResult, DEFAULT_AIRDROP_LAMPORTS, DEFAULT_AMOUNT,
    DEFAULT_CONFIRM_POLL_INTERVAL_MS, DEFAULT_DECIMALS, DEFAULT_FUNDING_THRESHOLD_LAMPORTS,
    DEFAULT_IMAGE_PATH, DEFAULT_TOKEN_DESCRIPTION, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
    DEVNET_URL, LOCALNET_URL, MAINNET_URL, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH,
    MOCK_STORAGE_BASE_URL, PRIVATE_KEY_ENV, TESTNET_URL,
};
use crate::mint::scale_amount;

/// Minter configuration, loaded from TOML and overridden by the environment
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MinterConfig {
    /// Base-58 (or JSON byte array) secret key of the paying identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// RPC URL or cluster moniker (devnet, testnet, mainnet-beta, localnet)
    pub network_endpoint: String,

    /// Commitment used for queries and confirmation
    pub commitment: String,

    /// Balance below which an airdrop is requested (in lamports)
    pub funding_threshold_lamports: u64,

    /// Amount requested per airdrop (in lamports)
    pub airdrop_lamports: u64,

    /// Delay between confirmation polls in milliseconds
    pub confirm_poll_interval_ms: u64,

    /// Image uploaded as the token logo
    pub image_path: PathBuf,

    /// Token being minted
    pub token: TokenParams,

    /// Where the image and metadata are uploaded
    pub storage: StorageConfig,
}

/// Parameters of the fungible token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// Decimal places of the mint
    pub decimals: u8,
    /// Initial supply in whole tokens
    pub amount: u64,
}

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In-process storage; URIs are derived from content hashes
    Mock {
        #[serde(default = "default_mock_base_url")]
        base_url: String,
    },
    /// Upload over HTTP to a storage gateway
    Http { endpoint: String },
}

fn default_mock_base_url() -> String {
    MOCK_STORAGE_BASE_URL.to_string()
}

impl MinterConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> MinterResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MinterError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: MinterConfig = toml::from_str(&content).map_err(|e| {
            MinterError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MinterResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| MinterError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            MinterError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Take the secret key from `PRIVATE_KEY` when it is set
    pub fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var(PRIVATE_KEY_ENV) {
            if !secret.trim().is_empty() {
                self.secret_key = Some(secret);
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> MinterResult<()> {
        if self.network_endpoint.trim().is_empty() {
            return Err(MinterError::invalid_parameter(
                "network_endpoint",
                "empty",
                "an RPC URL or cluster name",
            ));
        }

        self.commitment_config()?;

        if self.funding_threshold_lamports == 0 {
            return Err(MinterError::invalid_parameter(
                "funding_threshold_lamports",
                "0",
                "greater than 0",
            ));
        }

        if self.airdrop_lamports == 0 {
            return Err(MinterError::invalid_parameter(
                "airdrop_lamports",
                "0",
                "greater than 0",
            ));
        }

        if self.confirm_poll_interval_ms == 0 {
            return Err(MinterError::invalid_parameter(
                "confirm_poll_interval_ms",
                "0",
                "greater than 0",
            ));
        }

        self.token.validate()?;
        self.storage.validate()?;

        Ok(())
    }

    /// Decode the configured secret key into the signing identity
    pub fn identity(&self) -> MinterResult<Keypair> {
        let secret = self.secret_key.as_deref().ok_or_else(|| {
            MinterError::InvalidSecretKey(format!(
                "no secret key configured; set {} or secret_key",
                PRIVATE_KEY_ENV
            ))
        })?;
        decode_secret_key(secret)
    }

    /// RPC URL with cluster monikers expanded
    pub fn rpc_url(&self) -> String {
        resolve_endpoint(&self.network_endpoint)
    }

    pub fn commitment_config(&self) -> MinterResult<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(MinterError::invalid_parameter(
                "commitment",
                other,
                "processed, confirmed or finalized",
            )),
        }
    }

    /// Cluster name understood by the explorer, when the endpoint is a public cluster
    pub fn explorer_cluster(&self) -> Option<&'static str> {
        match self.rpc_url().as_str() {
            DEVNET_URL => Some("devnet"),
            TESTNET_URL => Some("testnet"),
            MAINNET_URL => Some("mainnet-beta"),
            _ => None,
        }
    }
}

impl TokenParams {
    fn validate(&self) -> MinterResult<()> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LENGTH {
            return Err(MinterError::invalid_parameter(
                "token.name",
                &self.name,
                &format!("1 to {} bytes", MAX_NAME_LENGTH),
            ));
        }

        if self.symbol.is_empty() || self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(MinterError::invalid_parameter(
                "token.symbol",
                &self.symbol,
                &format!("1 to {} bytes", MAX_SYMBOL_LENGTH),
            ));
        }

        scale_amount(self.amount, self.decimals).map_err(|_| {
            MinterError::invalid_parameter(
                "token.amount",
                &format!("{} with {} decimals", self.amount, self.decimals),
                "amount * 10^decimals to fit in u64",
            )
        })?;

        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> MinterResult<()> {
        match self {
            StorageConfig::Mock { base_url } if base_url.is_empty() => Err(
                MinterError::invalid_parameter("storage.base_url", "empty", "non-empty URL"),
            ),
            StorageConfig::Http { endpoint }
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) =>
            {
                Err(MinterError::invalid_parameter(
                    "storage.endpoint",
                    endpoint,
                    "an http(s) URL",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Expand a cluster moniker to its public RPC URL
pub fn resolve_endpoint(endpoint: &str) -> String {
    match endpoint.trim() {
        "devnet" => DEVNET_URL.to_string(),
        "testnet" => TESTNET_URL.to_string(),
        "mainnet" | "mainnet-beta" => MAINNET_URL.to_string(),
        "localnet" | "localhost" => LOCALNET_URL.to_string(),
        url => url.to_string(),
    }
}

/// Decode a secret key given either in base-58 or as a JSON byte array
pub fn decode_secret_key(secret: &str) -> MinterResult<Keypair> {
    let secret = secret.trim();
    let bytes: Vec<u8> = if secret.starts_with('[') {
        serde_json::from_str(secret)
            .map_err(|e| MinterError::InvalidSecretKey(format!("malformed byte array: {}", e)))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| MinterError::InvalidSecretKey(format!("malformed base-58: {}", e)))?
    };

    #[allow(deprecated)]
    let keypair = Keypair::from_bytes(&bytes);
    keypair.map_err(|e| MinterError::InvalidSecretKey(e.to_string()))
}

impl Default for MinterConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            network_endpoint: "devnet".to_string(),
            commitment: "confirmed".to_string(),
            funding_threshold_lamports: DEFAULT_FUNDING_THRESHOLD_LAMPORTS,
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            confirm_poll_interval_ms: DEFAULT_CONFIRM_POLL_INTERVAL_MS,
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            token: TokenParams::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            description: DEFAULT_TOKEN_DESCRIPTION.to_string(),
            decimals: DEFAULT_DECIMALS,
            amount: DEFAULT_AMOUNT,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Mock {
            base_url: MOCK_STORAGE_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for MinterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinterConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("network_endpoint", &self.network_endpoint)
            .field("commitment", &self.commitment)
            .field("funding_threshold_lamports", &self.funding_threshold_lamports)
            .field("airdrop_lamports", &self.airdrop_lamports)
            .field("confirm_poll_interval_ms", &self.confirm_poll_interval_ms)
            .field("image_path", &self.image_path)
            .field("token", &self.token)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Create example configuration file
pub fn create_example_config<P: AsRef<Path>>(path: P) -> MinterResult<()> {
    let example_config = MinterConfig {
        network_endpoint: "devnet".to_string(),
        image_path: PathBuf::from("assets/logo.png"),
        ..MinterConfig::default()
    };

    example_config.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;

    #[test]
    fn test_default_config_is_valid() {
        let config = MinterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rpc_url(), DEVNET_URL);
        assert_eq!(config.explorer_cluster(), Some("devnet"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = MinterConfig::default();
        config.funding_threshold_lamports = 0;
        assert!(config.validate().is_err());

        let mut config = MinterConfig::default();
        config.token.symbol = "TOOLONGSYMBOL".to_string();
        assert!(config.validate().is_err());

        let mut config = MinterConfig::default();
        config.token.amount = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = MinterConfig::default();
        config.commitment = "recent".to_string();
        assert!(config.validate().is_err());

        let mut config = MinterConfig::default();
        config.storage = StorageConfig::Http {
            endpoint: "ftp://storage".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_decode_secret_key_formats() {
        let keypair = Keypair::new();

        let from_base58 = decode_secret_key(&keypair.to_base58_string()).unwrap();
        assert_eq!(from_base58.pubkey(), keypair.pubkey());

        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let from_json = decode_secret_key(&json).unwrap();
        assert_eq!(from_json.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_decode_secret_key_rejects_garbage() {
        assert!(matches!(
            decode_secret_key("not-a-key-0OIl"),
            Err(MinterError::InvalidSecretKey(_))
        ));
        assert!(matches!(
            decode_secret_key("3yZe7d"),
            Err(MinterError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_missing_secret_key() {
        let config = MinterConfig::default();
        assert!(matches!(
            config.identity(),
            Err(MinterError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MinterConfig = toml::from_str(
            r#"
network_endpoint = "localnet"

[token]
name = "Test Token"
symbol = "TEST"
decimals = 2
amount = 5

[storage]
kind = "http"
endpoint = "https://uploads.example.com/files"
"#,
        )
        .unwrap();

        assert_eq!(config.rpc_url(), LOCALNET_URL);
        assert_eq!(config.explorer_cluster(), None);
        assert_eq!(config.token.description, DEFAULT_TOKEN_DESCRIPTION);
        assert_eq!(config.funding_threshold_lamports, DEFAULT_FUNDING_THRESHOLD_LAMPORTS);
        assert_eq!(
            config.storage,
            StorageConfig::Http {
                endpoint: "https://uploads.example.com/files".to_string()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mock_storage_kind_alone() {
        let config: MinterConfig = toml::from_str("[storage]\nkind = \"mock\"\n").unwrap();
        assert_eq!(config.storage, StorageConfig::default());

        let config: MinterConfig = toml::from_str(
            "[storage]\nkind = \"mock\"\nbase_url = \"https://files.local/\"\n",
        )
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Mock {
                base_url: "https://files.local/".to_string()
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = MinterConfig {
            secret_key: Some(Keypair::new().to_base58_string()),
            ..MinterConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(config.secret_key.as_deref().unwrap()));
    }

    #[test]
    fn test_example_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minter.toml");
        create_example_config(&path).unwrap();

        let loaded = MinterConfig::load(&path).unwrap();
        assert_eq!(loaded.image_path, PathBuf::from("assets/logo.png"));
        assert!(loaded.secret_key.is_none());
        assert!(loaded.validate().is_ok());
    }
}
