/// Constants shared by the funding, upload and mint stages

// ============================================================================
// Native Unit Constants
// ============================================================================

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Balance below which the funding guard asks the faucet for more
pub const DEFAULT_FUNDING_THRESHOLD_LAMPORTS: u64 = LAMPORTS_PER_SOL;

/// Amount requested from the faucet per airdrop
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

/// Interval between signature status polls while confirming
pub const DEFAULT_CONFIRM_POLL_INTERVAL_MS: u64 = 500;

// ============================================================================
// Cluster Endpoints
// ============================================================================

pub const DEVNET_URL: &str = "https://api.devnet.solana.com";
pub const TESTNET_URL: &str = "https://api.testnet.solana.com";
pub const MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const LOCALNET_URL: &str = "http://localhost:8899";

/// Environment variable holding the base-58 secret key
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

// ============================================================================
// Token Metadata Constants
// ============================================================================

/// Royalty charged on secondary sales (basis points)
pub const SELLER_FEE_BASIS_POINTS: u16 = 0;

/// Whether the metadata account can be updated after creation
pub const IS_MUTABLE: bool = true;

/// Maximum name length accepted by the token metadata program
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum symbol length accepted by the token metadata program
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// Maximum URI length accepted by the token metadata program
pub const MAX_URI_LENGTH: usize = 200;

// ============================================================================
// Default Token Parameters
// ============================================================================

pub const DEFAULT_TOKEN_NAME: &str = "Solana Gold";
pub const DEFAULT_TOKEN_SYMBOL: &str = "GOLDSOL";
pub const DEFAULT_TOKEN_DESCRIPTION: &str = "A gold Solana SPL token :)";
pub const DEFAULT_DECIMALS: u8 = 9;
pub const DEFAULT_AMOUNT: u64 = 1_000_000_000;
pub const DEFAULT_IMAGE_PATH: &str = "logo.png";

// ============================================================================
// Storage Constants
// ============================================================================

/// Base URL handed out by the in-memory storage backend
pub const MOCK_STORAGE_BASE_URL: &str = "https://mockstorage.com/";
