//! Session state - pure data structure with no I/O logic

use alloy_primitives::{Address, TxHash, U256};

use crate::messages::ui_events::{FormField, InputMode};
use crate::messages::RenderState;
use crate::models::{
    ConnectionStatus, ProviderEvent, StatusKind, StatusMessage, TransferDraft, TransferPhase,
};

/// Everything the session knows about the wallet. Lives for one session only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Present once bootstrap succeeded
    pub account: Option<Address>,
    pub balance_wei: U256,
    pub chain_id: Option<u64>,
    pub connection_status: ConnectionStatus,
    pub transfer_draft: TransferDraft,
    /// True strictly between submission start and its terminal outcome
    pub transfer_in_flight: bool,
    pub transfer_phase: TransferPhase,
    pub pending_tx: Option<TxHash>,
    pub last_tx: Option<TxHash>,
    pub status_message: Option<StatusMessage>,
}

/// Wallet session state machine.
///
/// Operations never perform I/O: they mutate the state and return the
/// provider command (if any) the App actor must dispatch.
pub struct WalletSession {
    pub state: SessionState,

    /// Whether a provider capability was handed to the session
    pub(crate) provider_detected: bool,
    pub(crate) bootstrapped: bool,
    pub(crate) connecting: bool,
    pub(crate) next_attempt_id: u64,
    pub(crate) pending_attempt: Option<u64>,
    pub(crate) status_generation: u64,
    pub(crate) reload_requested: Option<ProviderEvent>,

    // Presentation state
    pub focused_field: FormField,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub show_help: bool,
}

impl WalletSession {
    pub fn new(provider_detected: bool) -> Self {
        WalletSession {
            state: SessionState::default(),
            provider_detected,
            bootstrapped: false,
            connecting: false,
            next_attempt_id: 1,
            pending_attempt: None,
            status_generation: 0,
            reload_requested: None,
            focused_field: FormField::Recipient,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
        }
    }

    /// Generate a unique transfer attempt ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_attempt_id;
        self.next_attempt_id += 1;
        id
    }

    /// Replace the status message. The new message supersedes any pending clear.
    pub fn post_status(&mut self, text: impl Into<String>, kind: StatusKind, sticky: bool) {
        self.status_generation += 1;
        self.state.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
            sticky,
            posted_at: chrono::Utc::now(),
            generation: self.status_generation,
        });
    }

    pub fn status_text(&self) -> Option<&str> {
        self.state.status_message.as_ref().map(|m| m.text.as_str())
    }

    pub fn reload_requested(&self) -> Option<&ProviderEvent> {
        self.reload_requested.as_ref()
    }

    /// Get the focused input field content
    pub fn current_input(&self) -> &str {
        match self.focused_field {
            FormField::Recipient => &self.state.transfer_draft.recipient,
            FormField::Amount => &self.state.transfer_draft.amount_ether,
        }
    }

    /// Get mutable reference to the focused input field
    pub fn current_input_mut(&mut self) -> &mut String {
        match self.focused_field {
            FormField::Recipient => &mut self.state.transfer_draft.recipient,
            FormField::Amount => &mut self.state.transfer_draft.amount_ether,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            connection_status: self.state.connection_status,
            connecting: self.connecting,
            account: self.state.account,
            balance_wei: self.state.balance_wei,
            chain_id: self.state.chain_id,
            recipient: self.state.transfer_draft.recipient.clone(),
            amount_ether: self.state.transfer_draft.amount_ether.clone(),
            focused_field: self.focused_field,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            transfer_in_flight: self.state.transfer_in_flight,
            transfer_phase: self.state.transfer_phase,
            pending_tx: self.state.pending_tx,
            last_tx: self.state.last_tx,
            status_message: self.state.status_message.clone(),
            show_help: self.show_help,
        }
    }
}
