//! Render state - data structure sent from App layer to UI for rendering

use alloy_primitives::{Address, TxHash, U256};

use crate::messages::ui_events::{FormField, InputMode};
use crate::models::{ConnectionStatus, StatusMessage, TransferPhase};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderState {
    // Session
    pub connection_status: ConnectionStatus,
    /// Bootstrap requested and not answered yet
    pub connecting: bool,
    pub account: Option<Address>,
    pub balance_wei: U256,
    pub chain_id: Option<u64>,

    // Transfer form
    pub recipient: String,
    pub amount_ether: String,
    pub focused_field: FormField,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Transfer progress
    pub transfer_in_flight: bool,
    pub transfer_phase: TransferPhase,
    pub pending_tx: Option<TxHash>,
    pub last_tx: Option<TxHash>,

    pub status_message: Option<StatusMessage>,

    // Popups
    pub show_help: bool,
}
