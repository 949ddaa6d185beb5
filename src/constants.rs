//! Application constants
//!
//! Centralized location for user-facing strings and configuration defaults.

/// Application name, shown in the header
pub const APP_NAME: &str = "ETH Wallet";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Status messages
pub const MSG_PROVIDER_NOT_DETECTED: &str = "provider not detected";
pub const MSG_MISSING_FIELDS: &str = "please enter address and amount";
pub const MSG_AWAITING_WALLET: &str = "waiting for the wallet to send the transaction";
pub const MSG_TRANSFER_SUCCESS: &str = "transaction successful";
pub const MSG_TRANSFER_FAILED: &str = "transaction failed";

// Defaults
pub const DEFAULT_STATUS_TTL_MS: u64 = 4_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONFIRMATION_POLL_MS: u64 = 1_000;
pub const DEFAULT_EVENT_POLL_MS: u64 = 2_000;
pub const DEFAULT_LOG_FILE: &str = "ethwallet.log";

// Config file location, relative to the home directory
pub const CONFIG_DIR_NAME: &str = ".ethwallet";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// Environment overrides
pub const ENV_RPC_URL: &str = "ETHWALLET_RPC_URL";
pub const ENV_RPC_TOKEN: &str = "ETHWALLET_RPC_TOKEN";
pub const ENV_LOG_FILE: &str = "ETHWALLET_LOG";
