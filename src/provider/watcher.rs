//! Event watcher - turns account/chain samples into provider notifications

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::ProviderEvent;
use crate::provider::events::ListenerRegistry;
use crate::provider::rpc::RpcClient;

/// Samples `eth_accounts` and `eth_chainId` and emits `accountsChanged` /
/// `chainChanged` when either differs from the previous sample.
pub struct EventWatcher {
    rpc: RpcClient,
    registry: Arc<ListenerRegistry>,
    interval: Duration,
}

impl EventWatcher {
    pub fn new(rpc: RpcClient, registry: Arc<ListenerRegistry>, interval: Duration) -> Self {
        EventWatcher {
            rpc,
            registry,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut last_accounts = None;
        let mut last_chain = None;
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            ticker.tick().await;

            match self.rpc.accounts().await {
                Ok(accounts) => {
                    if let Some(accounts) = observe(&mut last_accounts, accounts) {
                        tracing::info!(?accounts, "Accounts changed");
                        self.registry.emit(&ProviderEvent::AccountsChanged(accounts));
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Account sample failed"),
            }

            match self.rpc.chain_id().await {
                Ok(chain_id) => {
                    if let Some(chain_id) = observe(&mut last_chain, chain_id) {
                        tracing::info!(chain_id, "Chain changed");
                        self.registry.emit(&ProviderEvent::ChainChanged(chain_id));
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Chain id sample failed"),
            }
        }
    }
}

/// Record `current`; returns it when it differs from an earlier sample.
/// The first sample only sets the baseline.
fn observe<T: PartialEq + Clone>(last: &mut Option<T>, current: T) -> Option<T> {
    match last.replace(current.clone()) {
        Some(previous) if previous != current => Some(current),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_baseline() {
        let mut last = None;
        assert_eq!(observe(&mut last, 1u64), None);
        assert_eq!(last, Some(1));
    }

    #[test]
    fn test_change_is_reported_once() {
        let mut last = Some(1u64);
        assert_eq!(observe(&mut last, 1), None);
        assert_eq!(observe(&mut last, 5), Some(5));
        assert_eq!(observe(&mut last, 5), None);
    }
}
