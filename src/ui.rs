use ratatui::{prelude::*, widgets::*};

use crate::models::{ConnectionStatus, StatusKind, TransferPhase};

/// Renders a text input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Status message color
pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Error => Color::Red,
    }
}

/// Transfer phase color
pub fn phase_color(phase: TransferPhase) -> Color {
    match phase {
        TransferPhase::Idle => Color::DarkGray,
        TransferPhase::Validating | TransferPhase::Submitting => Color::Yellow,
        TransferPhase::Confirming => Color::Cyan,
        TransferPhase::Succeeded => Color::Green,
        TransferPhase::Failed => Color::Red,
    }
}

pub fn connection_label(status: ConnectionStatus, connecting: bool) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Ready => ("connected", Color::Green),
        ConnectionStatus::Unavailable => ("no provider", Color::Red),
        ConnectionStatus::Uninitialized if connecting => ("connecting...", Color::Yellow),
        ConnectionStatus::Uninitialized => ("not connected", Color::DarkGray),
    }
}

/// Well-known chain names, falls back to the numeric id
pub fn chain_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum".to_string(),
        10 => "Optimism".to_string(),
        137 => "Polygon".to_string(),
        8453 => "Base".to_string(),
        42161 => "Arbitrum One".to_string(),
        11155111 => "Sepolia".to_string(),
        31337 => "Anvil".to_string(),
        id => format!("chain {}", id),
    }
}

/// Terminal column of the cursor inside a bordered input, clamped to the
/// last inner column. `cursor` is a byte offset into `content`.
pub fn cursor_column(area: Rect, content: &str, cursor: usize) -> u16 {
    let before = content.get(..cursor).unwrap_or(content);
    let width = u16::try_from(Line::from(before).width()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(width).min(max_x)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
