use alloy_primitives::{Address, TxHash};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization sent with every JSON-RPC request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RpcAuth {
    #[default]
    None,
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

impl RpcAuth {
    /// Value for the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            RpcAuth::None => None,
            RpcAuth::Bearer { token } => Some(format!("Bearer {}", token)),
            RpcAuth::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
        }
    }
}

/// Whether the session reached a usable provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Uninitialized,
    Ready,
    Unavailable,
}

/// Phase of the current (or last) transfer attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransferPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

impl TransferPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TransferPhase::Idle => "idle",
            TransferPhase::Validating => "validating",
            TransferPhase::Submitting => "waiting for wallet",
            TransferPhase::Confirming => "confirming",
            TransferPhase::Succeeded => "succeeded",
            TransferPhase::Failed => "failed",
        }
    }
}

/// Free-form transfer input, validated only on submission
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferDraft {
    pub recipient: String,
    pub amount_ether: String,
}

impl TransferDraft {
    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount_ether.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Short-lived message shown to the user after a terminal event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    /// Sticky messages are never auto-cleared
    pub sticky: bool,
    pub posted_at: DateTime<Utc>,
    /// Increases with every posted message; used to discard stale clear timers
    pub generation: u64,
}

/// Provider notifications the session subscribes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    pub const ALL: [ProviderEventKind; 2] = [
        ProviderEventKind::AccountsChanged,
        ProviderEventKind::ChainChanged,
    ];

    /// EIP-1193 event name
    pub fn as_str(&self) -> &str {
        match self {
            ProviderEventKind::AccountsChanged => "accountsChanged",
            ProviderEventKind::ChainChanged => "chainChanged",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }
}

/// Outcome of a mined transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_values() {
        assert_eq!(RpcAuth::None.header_value(), None);
        assert_eq!(
            RpcAuth::Bearer { token: "abc".into() }.header_value().as_deref(),
            Some("Bearer abc")
        );
        let basic = RpcAuth::Basic {
            username: "user".into(),
            password: "pass".into(),
        };
        assert_eq!(basic.header_value().as_deref(), Some("Basic dXNlcjpwYXNz"));
    }
}
