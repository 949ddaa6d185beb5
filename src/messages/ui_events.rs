//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Field navigation
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Transfer
    SubmitTransfer,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input field of the transfer form
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FormField {
    #[default]
    Recipient,
    Amount,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::Recipient => FormField::Amount,
            FormField::Amount => FormField::Recipient,
        }
    }

    pub fn prev(&self) -> FormField {
        // Two fields: prev == next
        self.next()
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    focused_field: FormField,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::SubmitTransfer),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Enter => match focused_field {
                FormField::Recipient => Some(UiEvent::NextField),
                FormField::Amount => Some(UiEvent::SubmitTransfer),
            },
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_keys() {
        let event = |code| key_to_ui_event(press(code), FormField::Recipient, InputMode::Normal, false);
        assert_eq!(event(KeyCode::Char('s')), Some(UiEvent::SubmitTransfer));
        assert_eq!(event(KeyCode::Char('q')), Some(UiEvent::Quit));
        assert_eq!(event(KeyCode::Tab), Some(UiEvent::NextField));
        assert_eq!(event(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_editing_mode_types_characters() {
        let event = key_to_ui_event(press(KeyCode::Char('s')), FormField::Amount, InputMode::Editing, false);
        assert_eq!(event, Some(UiEvent::CharInput('s')));
    }

    #[test]
    fn test_enter_submits_from_amount_field_only() {
        let from_amount = key_to_ui_event(press(KeyCode::Enter), FormField::Amount, InputMode::Editing, false);
        let from_recipient =
            key_to_ui_event(press(KeyCode::Enter), FormField::Recipient, InputMode::Editing, false);
        assert_eq!(from_amount, Some(UiEvent::SubmitTransfer));
        assert_eq!(from_recipient, Some(UiEvent::NextField));
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let event = key_to_ui_event(press(KeyCode::Char('s')), FormField::Amount, InputMode::Normal, true);
        assert_eq!(event, Some(UiEvent::CloseHelp));

        let quit = key_to_ui_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            FormField::Amount,
            InputMode::Normal,
            true,
        );
        assert_eq!(quit, Some(UiEvent::Quit));
    }
}
