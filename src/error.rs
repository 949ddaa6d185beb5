//! Error types shared across the session, provider and config layers

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::MSG_PROVIDER_NOT_DETECTED;

/// JSON-RPC error code for an unknown method.
const METHOD_NOT_FOUND: i64 = -32601;

/// EIP-1193 error code for a request the user rejected in the wallet.
const USER_REJECTED: i64 = 4001;

/// Failure of a single wallet provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("provider returned no accounts")]
    NoAccounts,
}

impl ProviderError {
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, ProviderError::Rpc { code, .. } if *code == METHOD_NOT_FOUND)
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ProviderError::Rpc { code, .. } if *code == USER_REJECTED)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        let msg = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else if e.is_decode() {
            return ProviderError::Decode(e.to_string());
        } else {
            format!("request failed: {}", e)
        };
        ProviderError::Transport(msg)
    }
}

/// Session-level fault taxonomy.
///
/// Every variant is recovered where it happens and ends up as the session's
/// status message; none of them propagate past the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("{}", MSG_PROVIDER_NOT_DETECTED)]
    ProviderUnavailable,
    #[error("{0}")]
    AuthorizationDenied(String),
    /// Bootstrap fault other than the account request itself
    #[error("{0}")]
    Provider(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Submission(String),
    #[error("{0}")]
    Confirmation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
