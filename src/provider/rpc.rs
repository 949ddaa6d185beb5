//! JSON-RPC wallet provider - executes wallet calls against an HTTP endpoint

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{ProviderEventKind, RpcAuth, TxReceipt};
use crate::provider::events::{Listener, ListenerId, ListenerRegistry};
use crate::provider::watcher::EventWatcher;
use crate::provider::InjectedProvider;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<U64>,
    /// Absent on pre-Byzantium receipts
    #[serde(default)]
    status: Option<U64>,
}

impl From<RpcReceipt> for TxReceipt {
    fn from(receipt: RpcReceipt) -> Self {
        TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|n| n.to::<u64>()),
            success: receipt.status.map_or(true, |status| status != U64::ZERO),
        }
    }
}

fn decode_envelope<T: DeserializeOwned>(envelope: RpcEnvelope) -> Result<T, ProviderError> {
    if let Some(error) = envelope.error {
        return Err(ProviderError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    serde_json::from_value(envelope.result.unwrap_or(Value::Null))
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Create an HTTP client with the configured timeout
fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Minimal JSON-RPC 2.0 client
#[derive(Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, auth: &RpcAuth, timeout: Duration) -> Self {
        RpcClient {
            client: create_client(timeout),
            url: url.into(),
            auth_header: auth.header_value(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut req_builder = self.client.post(&self.url).json(&RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        });
        if let Some(auth) = &self.auth_header {
            req_builder = req_builder.header("Authorization", auth);
        }

        tracing::debug!(id, method, "JSON-RPC call");
        let response = req_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Some endpoints answer JSON-RPC errors with a non-2xx status
        let envelope: RpcEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ProviderError::Transport(format!("HTTP {}", status)));
            }
            Err(e) => return Err(ProviderError::Decode(e.to_string())),
        };
        decode_envelope(envelope)
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.call("eth_accounts", json!([])).await
    }

    pub async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id: U64 = self.call("eth_chainId", json!([])).await?;
        Ok(chain_id.to::<u64>())
    }
}

/// Wallet provider backed by a JSON-RPC endpoint that holds the account keys
/// (a wallet daemon, a dev node with unlocked accounts, a signing proxy).
pub struct JsonRpcProvider {
    rpc: RpcClient,
    confirmation_poll: Duration,
    event_poll: Duration,
    registry: Arc<ListenerRegistry>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl JsonRpcProvider {
    pub fn new(url: impl Into<String>, config: &Config) -> Self {
        JsonRpcProvider {
            rpc: RpcClient::new(url, &config.auth, config.request_timeout()),
            confirmation_poll: config.confirmation_poll(),
            event_poll: config.event_poll(),
            registry: Arc::new(ListenerRegistry::new()),
            watcher: Mutex::new(None),
        }
    }

    /// `None` when no endpoint is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .rpc_url
            .as_ref()
            .map(|url| JsonRpcProvider::new(url.clone(), config))
    }

    /// Start sampling for account/chain changes once somebody listens
    fn ensure_watcher(&self) {
        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if watcher.is_none() {
            tracing::info!(interval_ms = self.event_poll.as_millis() as u64, "Starting provider event watcher");
            *watcher = Some(
                EventWatcher::new(self.rpc.clone(), self.registry.clone(), self.event_poll).spawn(),
            );
        }
    }
}

impl Drop for JsonRpcProvider {
    fn drop(&mut self) {
        let watcher = self.watcher.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = watcher.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl InjectedProvider for JsonRpcProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts: Vec<Address> = match self.rpc.call("eth_requestAccounts", json!([])).await {
            Ok(accounts) => accounts,
            // Plain nodes do not implement the EIP-1102 method
            Err(e) if e.is_method_not_found() => {
                tracing::debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.rpc.accounts().await?
            }
            Err(e) => return Err(e),
        };

        if accounts.is_empty() {
            return Err(ProviderError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.rpc.chain_id().await
    }

    async fn get_balance(&self, account: Address) -> Result<U256, ProviderError> {
        self.rpc.call("eth_getBalance", json!([account, "latest"])).await
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: &str,
        value: U256,
    ) -> Result<TxHash, ProviderError> {
        self.rpc
            .call(
                "eth_sendTransaction",
                json!([{ "from": from, "to": to, "value": value }]),
            )
            .await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError> {
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc
                .call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if let Some(receipt) = receipt {
                return Ok(receipt.into());
            }
            tokio::time::sleep(self.confirmation_poll).await;
        }
    }

    fn subscribe(&self, kind: ProviderEventKind, listener: Listener) -> ListenerId {
        let id = self.registry.subscribe(kind, listener);
        self.ensure_watcher();
        id
    }

    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        self.registry.unsubscribe(kind, id)
    }
}
