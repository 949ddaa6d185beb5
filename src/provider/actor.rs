//! Provider actor - runs wallet calls in the Tokio async runtime

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::WalletError;
use crate::messages::{ProviderCommand, ProviderResponse};
use crate::models::{ProviderEvent, ProviderEventKind};
use crate::provider::events::ListenerId;
use crate::provider::InjectedProvider;

/// Provider actor that executes session commands against the wallet provider
pub struct ProviderActor {
    provider: Arc<dyn InjectedProvider>,
    response_tx: mpsc::UnboundedSender<ProviderResponse>,
    event_tx: mpsc::UnboundedSender<ProviderEvent>,
    active_jobs: JoinSet<()>,
    subscriptions: Vec<(ProviderEventKind, ListenerId)>,
}

impl ProviderActor {
    pub fn new(
        provider: Arc<dyn InjectedProvider>,
        response_tx: mpsc::UnboundedSender<ProviderResponse>,
        event_tx: mpsc::UnboundedSender<ProviderEvent>,
    ) -> Self {
        ProviderActor {
            provider,
            response_tx,
            event_tx,
            active_jobs: JoinSet::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Run the provider actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ProviderCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ProviderCommand::Connect) => {
                            let provider = self.provider.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_jobs.spawn(async move {
                                tracing::info!("Requesting account access");
                                let response = connect(provider.as_ref()).await;
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(ProviderCommand::Subscribe) => self.subscribe(),

                        Some(ProviderCommand::SubmitTransfer { id, from, to, value }) => {
                            let provider = self.provider.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_jobs.spawn(async move {
                                execute_transfer(provider.as_ref(), id, from, &to, value, &response_tx).await;
                            });
                        }

                        Some(ProviderCommand::Shutdown) | None => break,
                    }
                }

                // Clean up completed jobs
                Some(_result) = self.active_jobs.join_next() => {}
            }
        }

        self.teardown();
    }

    /// Register the account/chain change listeners. They only forward the
    /// event; deciding what to do with it is up to the App layer.
    fn subscribe(&mut self) {
        if !self.subscriptions.is_empty() {
            return;
        }
        for kind in ProviderEventKind::ALL {
            let event_tx = self.event_tx.clone();
            let id = self.provider.subscribe(
                kind,
                Arc::new(move |event: &ProviderEvent| {
                    let _ = event_tx.send(event.clone());
                }),
            );
            tracing::debug!(event = kind.as_str(), ?id, "Subscribed to provider event");
            self.subscriptions.push((kind, id));
        }
    }

    /// Remove our listeners from the provider and drop outstanding jobs
    fn teardown(&mut self) {
        for (kind, id) in self.subscriptions.drain(..) {
            if !self.provider.unsubscribe(kind, id) {
                tracing::warn!(event = kind.as_str(), ?id, "Listener was already removed");
            }
        }
        self.active_jobs.abort_all();
        tracing::info!("Provider actor stopped");
    }
}

async fn connect(provider: &dyn InjectedProvider) -> ProviderResponse {
    let accounts = match provider.request_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::warn!(error = %e, "Account access denied");
            return ProviderResponse::ConnectFailed {
                error: WalletError::AuthorizationDenied(e.to_string()),
            };
        }
    };

    let Some(account) = accounts.first().copied() else {
        return ProviderResponse::ConnectFailed {
            error: WalletError::AuthorizationDenied("provider returned no accounts".to_string()),
        };
    };

    let chain_id = match provider.chain_id().await {
        Ok(chain_id) => Some(chain_id),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read chain id");
            None
        }
    };

    match provider.get_balance(account).await {
        Ok(balance) => ProviderResponse::Connected {
            account,
            chain_id,
            balance,
        },
        Err(e) => ProviderResponse::ConnectFailed {
            error: WalletError::Provider(e.to_string()),
        },
    }
}

/// Submit, await confirmation, refresh the balance. Never retries.
async fn execute_transfer(
    provider: &dyn InjectedProvider,
    id: u64,
    from: Address,
    to: &str,
    value: U256,
    response_tx: &mpsc::UnboundedSender<ProviderResponse>,
) {
    tracing::info!(id, to, %value, "Sending transaction");
    let tx_hash = match provider.send_transaction(from, to, value).await {
        Ok(tx_hash) => tx_hash,
        Err(e) => {
            tracing::warn!(id, error = %e, user_rejected = e.is_user_rejection(), "Transaction submission failed");
            let _ = response_tx.send(ProviderResponse::TransferFailed {
                id,
                error: WalletError::Submission(e.to_string()),
            });
            return;
        }
    };
    let _ = response_tx.send(ProviderResponse::TransferSubmitted { id, tx_hash });

    match provider.wait_for_confirmation(tx_hash).await {
        Ok(receipt) if receipt.success => {
            tracing::info!(id, %tx_hash, block = ?receipt.block_number, "Transaction confirmed");
        }
        Ok(_) => {
            tracing::warn!(id, %tx_hash, "Transaction reverted");
            let _ = response_tx.send(ProviderResponse::TransferFailed {
                id,
                error: WalletError::Confirmation(format!("transaction {} reverted", tx_hash)),
            });
            return;
        }
        Err(e) => {
            tracing::warn!(id, %tx_hash, error = %e, "Waiting for confirmation failed");
            let _ = response_tx.send(ProviderResponse::TransferFailed {
                id,
                error: WalletError::Confirmation(e.to_string()),
            });
            return;
        }
    }

    // The transfer is done either way; a failed refresh only keeps the old balance
    let balance = match provider.get_balance(from).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            tracing::warn!(id, error = %e, "Balance refresh failed");
            None
        }
    };
    let _ = response_tx.send(ProviderResponse::TransferConfirmed {
        id,
        tx_hash,
        balance,
    });
}
