//! App actor - message loop processing UI events and provider responses

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::state::WalletSession;
use crate::app::status::StatusTimer;
use crate::messages::ui_events::InputMode;
use crate::messages::{ProviderCommand, ProviderResponse, RenderState, UiEvent};
use crate::models::ProviderEvent;
use crate::provider::{InjectedProvider, ProviderActor};

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    Quit,
    /// The provider's account or chain changed; rebuild everything
    Reload(ProviderEvent),
}

/// Channels and task of a running provider actor
struct ProviderLink {
    cmd_tx: mpsc::UnboundedSender<ProviderCommand>,
    task: JoinHandle<()>,
}

/// App actor that owns the wallet session for its whole lifetime
pub struct AppActor {
    session: WalletSession,
    provider: Option<Arc<dyn InjectedProvider>>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    status_ttl: Duration,
}

impl AppActor {
    /// `provider` is the wallet capability; `None` means no wallet was detected.
    pub fn new(
        provider: Option<Arc<dyn InjectedProvider>>,
        render_tx: mpsc::UnboundedSender<RenderState>,
        status_ttl: Duration,
    ) -> Self {
        AppActor {
            session: WalletSession::new(provider.is_some()),
            provider,
            render_tx,
            status_ttl,
        }
    }

    /// Run the actor message loop until the user quits or the session is invalidated
    pub async fn run(mut self, mut ui_rx: mpsc::UnboundedReceiver<UiEvent>) -> SessionExit {
        let (response_tx, mut response_rx) = mpsc::unbounded_channel::<ProviderResponse>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ProviderEvent>();
        let (mut status_timer, mut expired_rx) = StatusTimer::new(self.status_ttl);

        let link = self.provider.take().map(|provider| {
            let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
            let task = tokio::spawn(ProviderActor::new(provider, response_tx, event_tx).run(cmd_rx));
            ProviderLink { cmd_tx, task }
        });

        // Mount
        if let Some(cmd) = self.session.bootstrap() {
            dispatch(&link, cmd);
        }
        status_timer.sync(self.session.state.status_message.as_ref());
        let _ = self.render_tx.send(self.session.to_render_state());

        let exit = loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    // UI gone means the terminal is closing
                    let Some(event) = event else {
                        break SessionExit::Quit;
                    };
                    if self.handle_ui_event(event, &link) {
                        break SessionExit::Quit;
                    }
                }
                Some(response) = response_rx.recv() => {
                    if let Some(cmd) = self.session.handle_response(response) {
                        dispatch(&link, cmd);
                    }
                }
                Some(event) = event_rx.recv() => {
                    if self.session.invalidate(event.clone()) {
                        break SessionExit::Reload(event);
                    }
                }
                Some(generation) = expired_rx.recv() => {
                    self.session.expire_status(generation);
                }
            }

            status_timer.sync(self.session.state.status_message.as_ref());
            let _ = self.render_tx.send(self.session.to_render_state());
        };

        tracing::info!(?exit, "Session ending");
        if let Some(link) = link {
            let _ = link.cmd_tx.send(ProviderCommand::Shutdown);
            let _ = link.task.await;
        }
        exit
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent, link: &Option<ProviderLink>) -> bool {
        match event {
            // Field navigation
            UiEvent::NextField => self.session.next_field(),
            UiEvent::PrevField => self.session.prev_field(),

            // Input editing
            UiEvent::StartEditing => self.session.start_editing(),
            UiEvent::StopEditing => self.session.stop_editing(),
            UiEvent::CharInput(c) => self.session.enter_char(c),
            UiEvent::Backspace => self.session.delete_char(),
            UiEvent::CursorLeft => self.session.move_cursor_left(),
            UiEvent::CursorRight => self.session.move_cursor_right(),

            // Transfer
            UiEvent::SubmitTransfer => {
                if self.session.input_mode == InputMode::Editing {
                    self.session.stop_editing();
                }
                if let Some(cmd) = self.session.submit_draft() {
                    dispatch(link, cmd);
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.session.toggle_help(),
            UiEvent::CloseHelp => self.session.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

fn dispatch(link: &Option<ProviderLink>, cmd: ProviderCommand) {
    match link {
        Some(link) => {
            let _ = link.cmd_tx.send(cmd);
        }
        None => tracing::warn!(?cmd, "No provider to dispatch to"),
    }
}
