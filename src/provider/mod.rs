//! Provider layer - the wallet capability the session is built on
//!
//! The Provider actor receives session commands, runs them against an
//! [`InjectedProvider`] and sends the outcomes back to the App layer.

pub mod actor;
pub mod events;
pub mod rpc;
pub mod watcher;

#[cfg(test)]
pub(crate) mod mock;

pub use actor::ProviderActor;
pub use events::{Listener, ListenerId, ListenerRegistry};
pub use rpc::JsonRpcProvider;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{ProviderEventKind, TxReceipt};

/// EIP-1193 style wallet capability.
///
/// The session never looks a provider up by itself; one is handed to it at
/// construction, or none is and the session reports the provider as missing.
#[async_trait]
pub trait InjectedProvider: Send + Sync {
    /// Ask the wallet for account access. May wait on user approval.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Balance in wei
    async fn get_balance(&self, account: Address) -> Result<U256, ProviderError>;

    /// Submit a value transfer. `to` is passed through unvalidated.
    async fn send_transaction(
        &self,
        from: Address,
        to: &str,
        value: U256,
    ) -> Result<TxHash, ProviderError>;

    /// Wait until the transaction is mined
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError>;

    fn subscribe(&self, kind: ProviderEventKind, listener: Listener) -> ListenerId;

    /// Returns false if the listener was not registered
    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool;
}
