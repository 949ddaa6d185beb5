//! Provider messages - communication between App and Provider layers

use alloy_primitives::{Address, TxHash, U256};

use crate::error::WalletError;

/// Commands sent from App layer to Provider layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    /// Request account access and read the initial balance
    Connect,
    /// Register the accountsChanged / chainChanged listeners
    Subscribe,
    /// Submit a transfer and wait for its confirmation
    SubmitTransfer {
        id: u64,
        from: Address,
        to: String,
        value: U256,
    },
    /// Remove listeners and stop the provider actor
    Shutdown,
}

/// Responses sent from Provider layer to App layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    Connected {
        account: Address,
        chain_id: Option<u64>,
        balance: U256,
    },
    ConnectFailed {
        error: WalletError,
    },
    /// The wallet accepted the transfer
    TransferSubmitted {
        id: u64,
        tx_hash: TxHash,
    },
    /// The transfer was mined. `balance` is the refreshed balance, if it could be read.
    TransferConfirmed {
        id: u64,
        tx_hash: TxHash,
        balance: Option<U256>,
    },
    TransferFailed {
        id: u64,
        error: WalletError,
    },
}

impl ProviderResponse {
    /// Transfer attempt this response belongs to, if any
    pub fn transfer_id(&self) -> Option<u64> {
        match self {
            ProviderResponse::TransferSubmitted { id, .. }
            | ProviderResponse::TransferConfirmed { id, .. }
            | ProviderResponse::TransferFailed { id, .. } => Some(*id),
            ProviderResponse::Connected { .. } | ProviderResponse::ConnectFailed { .. } => None,
        }
    }
}
