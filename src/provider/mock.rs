//! In-memory provider for tests

use std::sync::{Arc, Mutex};

use alloy_primitives::{address, Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::ProviderError;
use crate::models::{ProviderEvent, ProviderEventKind, TxReceipt};
use crate::provider::events::{Listener, ListenerId, ListenerRegistry};
use crate::provider::InjectedProvider;

pub(crate) const ALICE: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1");
pub(crate) const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";

pub(crate) struct MockProvider {
    account: Address,
    balance: Mutex<U256>,
    balance_after_transfer: Option<U256>,
    accounts_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    reverted: bool,
    confirmation_error: Option<ProviderError>,
    /// `get_balance` fails once a transfer went through
    balance_error_after_transfer: bool,
    transferred: Mutex<bool>,
    /// When set, `send_transaction` waits for a notification
    gate: Option<Arc<Notify>>,
    sends: Mutex<Vec<(String, U256)>>,
    balance_reads: Mutex<usize>,
    registry: ListenerRegistry,
}

impl MockProvider {
    pub(crate) fn new(account: Address, balance: U256) -> Self {
        MockProvider {
            account,
            balance: Mutex::new(balance),
            balance_after_transfer: None,
            accounts_error: None,
            send_error: None,
            reverted: false,
            confirmation_error: None,
            balance_error_after_transfer: false,
            transferred: Mutex::new(false),
            gate: None,
            sends: Mutex::new(Vec::new()),
            balance_reads: Mutex::new(0),
            registry: ListenerRegistry::new(),
        }
    }

    pub(crate) fn with_accounts_error(mut self, error: ProviderError) -> Self {
        self.accounts_error = Some(error);
        self
    }

    pub(crate) fn with_send_error(mut self, error: ProviderError) -> Self {
        self.send_error = Some(error);
        self
    }

    pub(crate) fn with_reverted_receipt(mut self) -> Self {
        self.reverted = true;
        self
    }

    pub(crate) fn with_confirmation_error(mut self, error: ProviderError) -> Self {
        self.confirmation_error = Some(error);
        self
    }

    pub(crate) fn with_balance_error_after_transfer(mut self) -> Self {
        self.balance_error_after_transfer = true;
        self
    }

    pub(crate) fn with_balance_after_transfer(mut self, balance: U256) -> Self {
        self.balance_after_transfer = Some(balance);
        self
    }

    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Every `send_transaction` call as (to, value)
    pub(crate) fn sends(&self) -> Vec<(String, U256)> {
        self.sends.lock().unwrap().clone()
    }

    pub(crate) fn balance_reads(&self) -> usize {
        *self.balance_reads.lock().unwrap()
    }

    pub(crate) fn emit(&self, event: &ProviderEvent) -> usize {
        self.registry.emit(event)
    }

    pub(crate) fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.registry.listener_count(kind)
    }
}

#[async_trait]
impl InjectedProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        match &self.accounts_error {
            Some(error) => Err(error.clone()),
            None => Ok(vec![self.account]),
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(1)
    }

    async fn get_balance(&self, _account: Address) -> Result<U256, ProviderError> {
        *self.balance_reads.lock().unwrap() += 1;
        if self.balance_error_after_transfer && *self.transferred.lock().unwrap() {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn send_transaction(
        &self,
        _from: Address,
        to: &str,
        value: U256,
    ) -> Result<TxHash, ProviderError> {
        self.sends.lock().unwrap().push((to.to_string(), value));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = &self.send_error {
            return Err(error.clone());
        }
        *self.transferred.lock().unwrap() = true;
        if let Some(balance) = self.balance_after_transfer {
            *self.balance.lock().unwrap() = balance;
        }
        Ok(TxHash::repeat_byte(0x11))
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt, ProviderError> {
        if let Some(error) = &self.confirmation_error {
            return Err(error.clone());
        }
        Ok(TxReceipt {
            tx_hash,
            block_number: Some(1),
            success: !self.reverted,
        })
    }

    fn subscribe(&self, kind: ProviderEventKind, listener: Listener) -> ListenerId {
        self.registry.subscribe(kind, listener)
    }

    fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        self.registry.unsubscribe(kind, id)
    }
}
