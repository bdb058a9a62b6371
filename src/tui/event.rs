//! Keyboard handling for the form

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key action derived from key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Select previous field
    Up,
    /// Select next field
    Down,
    /// Type into the selected field
    Input(char),
    /// Delete last typed character
    Backspace,
    /// Commit the selected field
    Commit,
    /// Discard the uncommitted text
    Cancel,
    /// Run the model on the current inputs
    Predict,
    /// Reset all fields to the default
    Reset,
    /// Show help
    Help,
    /// No action
    None,
}

impl From<KeyEvent> for KeyAction {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('p') | KeyCode::F(5) => KeyAction::Predict,
            KeyCode::Char('r') => KeyAction::Reset,
            KeyCode::Char('?') => KeyAction::Help,
            KeyCode::Char(c) => KeyAction::Input(c),
            KeyCode::Up | KeyCode::BackTab => KeyAction::Up,
            KeyCode::Down | KeyCode::Tab => KeyAction::Down,
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Enter => KeyAction::Commit,
            KeyCode::Esc => KeyAction::Cancel,
            _ => KeyAction::None,
        }
    }
}
