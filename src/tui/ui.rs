//! Main UI rendering logic
//!
//! Orchestrates the layout and renders all widgets.

use ratatui::{
    layout::{Constraint, Layout},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::FormApp;
use crate::tui::theme::THEME;
use crate::tui::widgets;

/// Render the entire UI
pub fn render(f: &mut Frame, app: &FormApp) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Min(5),    // Input fields (scrolls)
        Constraint::Length(3), // Predict / result panel
        Constraint::Length(1), // Footer
    ])
    .split(f.area());

    let title = Line::styled(
        format!(" Inflation Rate Forecast for {}", app.target_year()),
        THEME.title_style(),
    );
    f.render_widget(Paragraph::new(title), chunks[0]);

    widgets::render_fields(f, chunks[1], app);
    widgets::render_notification(f, chunks[2], app);
    widgets::render_footer(f, chunks[3], app);

    if app.show_help {
        widgets::render_help(f, f.area());
    }
}
