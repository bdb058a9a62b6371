//! Theme and color definitions for the form
//!
//! Cyan borders, yellow for the field being edited, green/red notifications.

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the form
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border color (cyan)
    pub border: Color,
    /// Title color
    pub title: Color,
    /// Field label color
    pub label: Color,
    /// Committed value color
    pub value: Color,
    /// Field being edited (yellow)
    pub editing: Color,
    /// Success notification (green)
    pub success: Color,
    /// Error notification (red)
    pub error: Color,
    /// Inactive/dim color
    pub inactive: Color,
    /// Selected row background
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::Cyan,
            title: Color::Cyan,
            label: Color::White,
            value: Color::White,
            editing: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            inactive: Color::DarkGray,
            selected_bg: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label)
    }

    pub fn value_style(&self, editing: bool) -> Style {
        if editing {
            Style::default().fg(self.editing).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.value)
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default().bg(self.selected_bg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn inactive_style(&self) -> Style {
        Style::default().fg(self.inactive)
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);
