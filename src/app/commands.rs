//! Command handlers - session lifecycle and transfer workflow

use crate::app::state::WalletSession;
use crate::constants::{MSG_AWAITING_WALLET, MSG_MISSING_FIELDS, MSG_TRANSFER_FAILED, MSG_TRANSFER_SUCCESS};
use crate::error::WalletError;
use crate::messages::ui_events::InputMode;
use crate::messages::{ProviderCommand, ProviderResponse};
use crate::models::{ConnectionStatus, ProviderEvent, StatusKind, TransferPhase};
use crate::units::parse_amount;

impl WalletSession {
    // ========================
    // Bootstrap
    // ========================

    /// Start the session. Runs once; later calls are ignored.
    pub fn bootstrap(&mut self) -> Option<ProviderCommand> {
        if self.bootstrapped {
            tracing::warn!("Bootstrap already ran for this session");
            return None;
        }
        self.bootstrapped = true;

        if !self.provider_detected {
            tracing::warn!("No wallet provider configured");
            self.state.connection_status = ConnectionStatus::Unavailable;
            self.post_status(WalletError::ProviderUnavailable.to_string(), StatusKind::Error, true);
            return None;
        }

        self.connecting = true;
        Some(ProviderCommand::Connect)
    }

    // ========================
    // Transfer
    // ========================

    /// Submit the transfer currently in the form
    pub fn submit_draft(&mut self) -> Option<ProviderCommand> {
        let draft = self.state.transfer_draft.clone();
        self.submit_transfer(&draft.recipient, &draft.amount_ether)
    }

    /// Validate input and start a transfer attempt.
    ///
    /// Returns `None` when nothing must be sent to the provider: a transfer is
    /// already in flight, the session is not ready, or the input is invalid.
    /// The recipient is not validated here; the provider rejects bad addresses.
    pub fn submit_transfer(
        &mut self,
        recipient: &str,
        amount_ether: &str,
    ) -> Option<ProviderCommand> {
        if self.state.transfer_in_flight {
            tracing::debug!("Transfer already in flight, ignoring submission");
            return None;
        }

        let account = match (self.state.connection_status, self.state.account) {
            (ConnectionStatus::Ready, Some(account)) => account,
            (status, _) => {
                tracing::debug!(?status, "Session not ready, ignoring submission");
                return None;
            }
        };

        self.state.transfer_phase = TransferPhase::Validating;
        let recipient = recipient.trim();
        let amount_ether = amount_ether.trim();

        if recipient.is_empty() || amount_ether.is_empty() {
            self.reject_transfer(MSG_MISSING_FIELDS.to_string());
            return None;
        }

        let value = match parse_amount(amount_ether) {
            Ok(value) => value,
            Err(e) => {
                self.reject_transfer(e.to_string());
                return None;
            }
        };

        let id = self.next_id();
        self.state.transfer_in_flight = true;
        self.state.transfer_phase = TransferPhase::Submitting;
        self.state.pending_tx = None;
        self.pending_attempt = Some(id);
        self.input_mode = InputMode::Normal;
        self.post_status(MSG_AWAITING_WALLET, StatusKind::Info, false);

        tracing::info!(id, to = recipient, %value, "Submitting transfer");
        Some(ProviderCommand::SubmitTransfer {
            id,
            from: account,
            to: recipient.to_string(),
            value,
        })
    }

    /// Local validation failure: no attempt was started
    fn reject_transfer(&mut self, message: String) {
        tracing::debug!(reason = %message, "Transfer rejected before submission");
        self.state.transfer_phase = TransferPhase::Idle;
        self.post_status(message, StatusKind::Error, false);
    }

    /// Close the pending attempt, in every outcome path
    fn finish_transfer(&mut self, phase: TransferPhase) {
        self.state.transfer_in_flight = false;
        self.state.transfer_phase = phase;
        self.state.pending_tx = None;
        self.pending_attempt = None;
    }

    // ========================
    // Provider responses
    // ========================

    pub fn handle_response(&mut self, response: ProviderResponse) -> Option<ProviderCommand> {
        if let Some(id) = response.transfer_id() {
            if self.pending_attempt != Some(id) {
                tracing::debug!(id, "Dropping response for a transfer that is no longer pending");
                return None;
            }
        }

        match response {
            ProviderResponse::Connected {
                account,
                chain_id,
                balance,
            } => {
                tracing::info!(%account, ?chain_id, %balance, "Wallet connected");
                self.connecting = false;
                self.state.account = Some(account);
                self.state.balance_wei = balance;
                self.state.chain_id = chain_id;
                self.state.connection_status = ConnectionStatus::Ready;
                return Some(ProviderCommand::Subscribe);
            }
            ProviderResponse::ConnectFailed { error } => {
                tracing::warn!(error = %error, "Wallet connection failed");
                self.connecting = false;
                self.post_status(error.to_string(), StatusKind::Error, true);
            }
            ProviderResponse::TransferSubmitted { tx_hash, .. } => {
                self.state.transfer_phase = TransferPhase::Confirming;
                self.state.pending_tx = Some(tx_hash);
            }
            ProviderResponse::TransferConfirmed {
                tx_hash, balance, ..
            } => {
                self.finish_transfer(TransferPhase::Succeeded);
                self.state.last_tx = Some(tx_hash);
                self.state.transfer_draft.clear();
                self.cursor_position = 0;
                if let Some(balance) = balance {
                    self.state.balance_wei = balance;
                }
                self.post_status(MSG_TRANSFER_SUCCESS, StatusKind::Success, false);
            }
            ProviderResponse::TransferFailed { error, .. } => {
                self.finish_transfer(TransferPhase::Failed);
                self.post_status(
                    format!("{}: {}", MSG_TRANSFER_FAILED, error),
                    StatusKind::Error,
                    false,
                );
            }
        }

        None
    }

    // ========================
    // Invalidation & status expiry
    // ========================

    /// Record an account/chain change. Returns true only for the first event:
    /// the session is reloaded once, whatever fires afterwards.
    pub fn invalidate(&mut self, event: ProviderEvent) -> bool {
        if self.reload_requested.is_some() {
            return false;
        }
        tracing::info!(event = event.kind().as_str(), "Session invalidated by provider event");
        self.reload_requested = Some(event);
        true
    }

    /// Clear the status message if `generation` still identifies it
    pub fn expire_status(&mut self, generation: u64) -> bool {
        match &self.state.status_message {
            Some(message) if message.generation == generation && !message.sticky => {
                self.state.status_message = None;
                true
            }
            _ => false,
        }
    }

    // ========================
    // Navigation
    // ========================

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Input editing
    // ========================

    /// The draft is frozen while a transfer is in flight
    fn can_edit(&self) -> bool {
        self.state.connection_status == ConnectionStatus::Ready && !self.state.transfer_in_flight
    }

    pub fn start_editing(&mut self) {
        if self.can_edit() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if !self.can_edit() {
            return;
        }
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if !self.can_edit() || self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        let prev_pos = input[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        input.remove(prev_pos);
        self.cursor_position = prev_pos;
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MSG_PROVIDER_NOT_DETECTED;
    use crate::messages::ui_events::FormField;
    use alloy_primitives::{address, Address, TxHash, U256};

    const ALICE: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1");
    const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";

    fn balance() -> U256 {
        U256::from(2_500_000_000_000_000_000u128)
    }

    fn ready_session() -> WalletSession {
        let mut session = WalletSession::new(true);
        assert_eq!(session.bootstrap(), Some(ProviderCommand::Connect));
        let follow_up = session.handle_response(ProviderResponse::Connected {
            account: ALICE,
            chain_id: Some(1),
            balance: balance(),
        });
        assert_eq!(follow_up, Some(ProviderCommand::Subscribe));
        session
    }

    fn submitted_id(command: Option<ProviderCommand>) -> u64 {
        match command {
            Some(ProviderCommand::SubmitTransfer { id, .. }) => id,
            other => panic!("expected a transfer submission, got {:?}", other),
        }
    }

    #[test]
    fn test_bootstrap_without_provider() {
        let mut session = WalletSession::new(false);
        assert_eq!(session.bootstrap(), None);
        assert_eq!(session.state.connection_status, ConnectionStatus::Unavailable);
        assert_eq!(session.status_text(), Some(MSG_PROVIDER_NOT_DETECTED));
        assert!(session.state.status_message.as_ref().unwrap().sticky);
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let mut session = WalletSession::new(true);
        assert_eq!(session.bootstrap(), Some(ProviderCommand::Connect));
        assert_eq!(session.bootstrap(), None);
    }

    #[test]
    fn test_connected_populates_state() {
        let session = ready_session();
        assert_eq!(session.state.account, Some(ALICE));
        assert_eq!(session.state.balance_wei, balance());
        assert_eq!(session.state.connection_status, ConnectionStatus::Ready);
        assert!(!session.to_render_state().connecting);
    }

    #[test]
    fn test_connect_failure_keeps_uninitialized() {
        let mut session = WalletSession::new(true);
        session.bootstrap();
        session.handle_response(ProviderResponse::ConnectFailed {
            error: WalletError::AuthorizationDenied("User rejected the request.".into()),
        });
        assert_eq!(session.state.connection_status, ConnectionStatus::Uninitialized);
        assert_eq!(session.status_text(), Some("User rejected the request."));
        assert_eq!(session.state.account, None);
    }

    #[test]
    fn test_empty_fields_are_rejected_locally() {
        let mut session = ready_session();

        assert_eq!(session.submit_transfer("", "1.0"), None);
        assert!(!session.state.transfer_in_flight);
        assert_eq!(session.status_text(), Some(MSG_MISSING_FIELDS));

        assert_eq!(session.submit_transfer(BOB, ""), None);
        assert!(!session.state.transfer_in_flight);
        assert_eq!(session.state.transfer_phase, TransferPhase::Idle);
    }

    #[test]
    fn test_invalid_amount_is_a_validation_failure() {
        let mut session = ready_session();
        assert_eq!(session.submit_transfer(BOB, "-1"), None);
        assert!(session.status_text().unwrap().starts_with("invalid amount"));
        assert_eq!(session.submit_transfer(BOB, "one"), None);
        assert!(!session.state.transfer_in_flight);
    }

    #[test]
    fn test_submit_converts_amount_to_wei() {
        let mut session = ready_session();
        let command = session.submit_transfer(BOB, "1.5");
        assert_eq!(
            command,
            Some(ProviderCommand::SubmitTransfer {
                id: 1,
                from: ALICE,
                to: BOB.to_string(),
                value: U256::from(1_500_000_000_000_000_000u128),
            })
        );
        assert!(session.state.transfer_in_flight);
        assert_eq!(session.state.transfer_phase, TransferPhase::Submitting);
        let notice = session.state.status_message.as_ref().unwrap();
        assert_eq!(notice.text, MSG_AWAITING_WALLET);
        assert_eq!(notice.kind, StatusKind::Info);
        assert!(!notice.sticky);
    }

    #[test]
    fn test_recipient_is_passed_through_unvalidated() {
        let mut session = ready_session();
        let command = session.submit_transfer("not-an-address", "1");
        assert!(matches!(
            command,
            Some(ProviderCommand::SubmitTransfer { ref to, .. }) if to == "not-an-address"
        ));
    }

    #[test]
    fn test_second_submission_while_in_flight_is_ignored() {
        let mut session = ready_session();
        assert!(session.submit_transfer(BOB, "1").is_some());
        let status_before = session.state.status_message.clone();
        assert_eq!(session.submit_transfer(BOB, "1"), None);
        assert_eq!(session.state.status_message, status_before);
    }

    #[test]
    fn test_submit_before_ready_is_ignored() {
        let mut session = WalletSession::new(true);
        session.bootstrap();
        assert_eq!(session.submit_transfer(BOB, "1"), None);
        assert!(!session.state.transfer_in_flight);
    }

    #[test]
    fn test_confirmed_transfer_clears_draft_and_refreshes_balance() {
        let mut session = ready_session();
        session.state.transfer_draft.recipient = BOB.into();
        session.state.transfer_draft.amount_ether = "1".into();
        let id = submitted_id(session.submit_draft());

        let tx_hash = TxHash::repeat_byte(0x11);
        session.handle_response(ProviderResponse::TransferSubmitted { id, tx_hash });
        assert_eq!(session.state.transfer_phase, TransferPhase::Confirming);
        assert_eq!(session.state.pending_tx, Some(tx_hash));

        let new_balance = U256::from(1_000_000_000_000_000_000u128);
        session.handle_response(ProviderResponse::TransferConfirmed {
            id,
            tx_hash,
            balance: Some(new_balance),
        });

        assert!(!session.state.transfer_in_flight);
        assert_eq!(session.state.transfer_phase, TransferPhase::Succeeded);
        assert_eq!(session.status_text(), Some(MSG_TRANSFER_SUCCESS));
        assert!(session.state.transfer_draft.recipient.is_empty());
        assert!(session.state.transfer_draft.amount_ether.is_empty());
        assert_eq!(session.state.balance_wei, new_balance);
        assert_eq!(session.state.last_tx, Some(tx_hash));
    }

    #[test]
    fn test_confirmed_without_refreshed_balance_keeps_old_balance() {
        let mut session = ready_session();
        session.state.transfer_draft.recipient = BOB.into();
        session.state.transfer_draft.amount_ether = "1".into();
        let id = submitted_id(session.submit_draft());

        session.handle_response(ProviderResponse::TransferConfirmed {
            id,
            tx_hash: TxHash::repeat_byte(0x22),
            balance: None,
        });

        assert!(!session.state.transfer_in_flight);
        assert_eq!(session.state.transfer_phase, TransferPhase::Succeeded);
        assert_eq!(session.status_text(), Some(MSG_TRANSFER_SUCCESS));
        assert!(session.state.transfer_draft.recipient.is_empty());
        assert_eq!(session.state.balance_wei, balance());
    }

    #[test]
    fn test_confirmation_fault_reports_failure() {
        let mut session = ready_session();
        let id = submitted_id(session.submit_transfer(BOB, "1"));

        session.handle_response(ProviderResponse::TransferFailed {
            id,
            error: WalletError::Confirmation("request timed out".into()),
        });

        assert_eq!(session.state.transfer_phase, TransferPhase::Failed);
        assert_eq!(session.status_text(), Some("transaction failed: request timed out"));
        assert_eq!(session.state.balance_wei, balance());
    }

    #[test]
    fn test_failed_transfer_keeps_balance() {
        let mut session = ready_session();
        let id = submitted_id(session.submit_transfer(BOB, "1"));

        session.handle_response(ProviderResponse::TransferFailed {
            id,
            error: WalletError::Submission("insufficient funds for transfer".into()),
        });

        assert!(!session.state.transfer_in_flight);
        assert_eq!(session.state.balance_wei, balance());
        assert_eq!(
            session.status_text(),
            Some("transaction failed: insufficient funds for transfer")
        );
        // usable for the next attempt
        assert!(session.submit_transfer(BOB, "0.5").is_some());
    }

    #[test]
    fn test_stale_transfer_response_is_dropped() {
        let mut session = ready_session();
        let id = submitted_id(session.submit_transfer(BOB, "1"));
        session.handle_response(ProviderResponse::TransferFailed {
            id: id + 7,
            error: WalletError::Submission("boom".into()),
        });
        assert!(session.state.transfer_in_flight);
    }

    #[test]
    fn test_invalidate_only_once() {
        let mut session = ready_session();
        assert!(session.invalidate(ProviderEvent::ChainChanged(5)));
        assert!(!session.invalidate(ProviderEvent::AccountsChanged(vec![])));
        assert_eq!(session.reload_requested(), Some(&ProviderEvent::ChainChanged(5)));
    }

    #[test]
    fn test_superseded_status_is_not_expired() {
        let mut session = ready_session();
        session.submit_transfer("", "");
        let first = session.state.status_message.as_ref().unwrap().generation;
        session.submit_transfer(BOB, "abc");
        let second = session.state.status_message.as_ref().unwrap().generation;

        assert!(!session.expire_status(first));
        assert!(session.state.status_message.is_some());
        assert!(session.expire_status(second));
        assert!(session.state.status_message.is_none());
    }

    #[test]
    fn test_sticky_status_never_expires() {
        let mut session = WalletSession::new(false);
        session.bootstrap();
        let generation = session.state.status_message.as_ref().unwrap().generation;
        assert!(!session.expire_status(generation));
    }

    #[test]
    fn test_editing_fills_focused_field() {
        let mut session = ready_session();
        session.start_editing();
        for c in "0xbb".chars() {
            session.enter_char(c);
        }
        session.delete_char();
        session.next_field();
        session.enter_char('2');

        assert_eq!(session.state.transfer_draft.recipient, "0xb");
        assert_eq!(session.state.transfer_draft.amount_ether, "2");
        assert_eq!(session.focused_field, FormField::Amount);
    }

    #[test]
    fn test_draft_is_frozen_while_in_flight() {
        let mut session = ready_session();
        session.state.transfer_draft.recipient = BOB.into();
        session.state.transfer_draft.amount_ether = "1".into();
        session.submit_draft();

        session.focused_field = FormField::Amount;
        session.cursor_position = 1;
        session.enter_char('0');
        assert_eq!(session.state.transfer_draft.amount_ether, "1");
        session.start_editing();
        assert_eq!(session.input_mode, InputMode::Normal);
    }
}
