//! ETH Wallet TUI - Actor-based wallet session
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - wallet session state machine processing events
//! - Provider Layer (Tokio) - async JSON-RPC wallet calls

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use ethwallet_tui::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use ethwallet_tui::messages::ui_events::{key_to_ui_event, FormField, InputMode};
use ethwallet_tui::models::ConnectionStatus;
use ethwallet_tui::provider::InjectedProvider;
use ethwallet_tui::ui::{
    centered_rect, chain_name, connection_label, cursor_column, phase_color, render_input, status_color,
};
use ethwallet_tui::units::{format_balance, short_address};
use ethwallet_tui::{AppActor, Config, JsonRpcProvider, RenderState, SessionExit, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;

    // Initialize logging to file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = APP_VERSION, provider_configured = config.rpc_url.is_some(), "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Each iteration is one wallet session; a reload starts from scratch
    loop {
        let provider = JsonRpcProvider::from_config(&config)
            .map(|provider| Arc::new(provider) as Arc<dyn InjectedProvider>);

        let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

        let app_actor = AppActor::new(provider, render_tx, config.status_ttl());
        let session = tokio::spawn(app_actor.run(ui_rx));

        let quit_requested = run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;
        let exit = session.await.context("app actor panicked")?;

        match exit {
            SessionExit::Reload(event) if !quit_requested => {
                tracing::info!(event = event.kind().as_str(), "Reloading wallet session");
                config = Config::load().context("failed to reload configuration")?;
            }
            _ => break,
        }
    }

    Ok(())
}

/// Run the synchronous UI rendering loop.
///
/// Returns true if the user quit, false if the session ended on its own.
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<bool> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.focused_field,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        return Ok(true);
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        loop {
            match render_rx.try_recv() {
                Ok(state) => current_state = state,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return Ok(false),
            }
        }
    }
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(5), // Account
            Constraint::Min(9),    // Transfer form
            Constraint::Length(3), // Status message
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);
    draw_account(f, state, main_chunks[1]);
    draw_transfer(f, state, main_chunks[2]);
    draw_status_message(f, state, main_chunks[3]);
    draw_status_bar(f, state, main_chunks[4]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let (label, color) = connection_label(state.connection_status, state.connecting);
    let chain = state.chain_id.map(chain_name).unwrap_or_default();

    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(format!("[{}]", label), Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(chain, Style::default().fg(Color::Magenta)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_account(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Account ");

    let lines = match (state.connection_status, state.account) {
        (ConnectionStatus::Ready, Some(account)) => vec![
            Line::from(vec![
                Span::styled("Address: ", Style::default().fg(Color::DarkGray)),
                Span::styled(account.to_string(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("Balance: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} ETH", format_balance(state.balance_wei)),
                    Style::default().fg(Color::Green).bold(),
                ),
            ]),
        ],
        (ConnectionStatus::Unavailable, _) => vec![Line::from(Span::styled(
            "Configure an RPC endpoint (rpc_url) to connect a wallet.",
            Style::default().fg(Color::DarkGray),
        ))],
        _ if state.connecting => vec![Line::from(Span::styled(
            "Waiting for the wallet to grant account access...",
            Style::default().fg(Color::Yellow),
        ))],
        _ => vec![Line::from(Span::styled(
            "Not connected.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_transfer(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Send ETH ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Recipient
            Constraint::Length(3), // Amount
            Constraint::Min(1),    // Progress
        ])
        .split(inner);

    let editing = state.input_mode == InputMode::Editing;
    let fields = [
        (FormField::Recipient, state.recipient.as_str(), " Recipient address ", chunks[0]),
        (FormField::Amount, state.amount_ether.as_str(), " Amount (ETH) ", chunks[1]),
    ];
    for (field, content, title, field_area) in fields {
        let is_focused = state.focused_field == field;
        f.render_widget(render_input(content, title, is_focused, editing), field_area);

        // Cursor
        if is_focused && editing {
            let cursor_x = cursor_column(field_area, content, state.cursor_position);
            f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
        }
    }

    let button = if state.transfer_in_flight {
        Span::styled(" [ Sending... ] ", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(" [ Send (s) ] ", Style::default().fg(Color::Black).bg(Color::Green).bold())
    };
    let mut progress = vec![
        button,
        Span::styled(
            format!(" {} ", state.transfer_phase.as_str()),
            Style::default().fg(phase_color(state.transfer_phase)),
        ),
    ];
    if let Some(tx) = state.pending_tx.or(state.last_tx) {
        progress.push(Span::styled(format!(" tx {}", tx), Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(progress)), chunks[2]);
}

fn draw_status_message(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(message) = &state.status_message else {
        return;
    };

    let color = status_color(message.kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title_bottom(Line::from(format!(" {} ", message.posted_at.format("%H:%M:%S"))).right_aligned());

    let text = Paragraph::new(message.text.as_str())
        .style(Style::default().fg(color))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(text, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.transfer_in_flight {
        " Transfer in progress... ".to_string()
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field | Enter:next/send ".to_string()
    } else {
        let account = state.account.as_ref().map(short_address).unwrap_or_default();
        format!(" Tab:field | e:edit | s:send | ?:help | q:quit  {}", account)
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 ETH WALLET - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch fields
   ↑ / ↓              Switch fields

 TRANSFER
   e / Enter          Edit current field
   Enter (amount)     Send transfer
   s                  Send transfer
   Esc                Stop editing

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Switching account or network in the wallet
 reloads the session.

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
