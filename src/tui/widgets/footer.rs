//! Footer key hints

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::FormApp;
use crate::tui::theme::THEME;

/// Render the footer status bar
pub fn render_footer(f: &mut Frame, area: Rect, app: &FormApp) {
    let hints = [
        ("↑/↓", "select"),
        ("0-9 . -", "edit"),
        ("Enter", "commit"),
        ("p", "predict"),
        ("r", "reset"),
        ("?", "help"),
        ("q", "quit"),
    ];

    let mut spans = Vec::with_capacity(hints.len() * 3 + 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), THEME.title_style()));
        spans.push(Span::styled(format!(" {label}"), THEME.inactive_style()));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!("  predictions: {}", app.predictions_made),
        THEME.label_style(),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
