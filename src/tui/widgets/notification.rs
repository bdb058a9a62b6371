//! Prediction result panel

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::{FormApp, FormStatus};
use crate::tui::theme::THEME;

/// Render the Predict button and, after a trigger, the result line
pub fn render_notification(f: &mut Frame, area: Rect, app: &FormApp) {
    let title = match &app.status {
        FormStatus::Predicted { at, .. } => format!(" PREDICT [p] @ {} ", at.format("%H:%M:%S")),
        _ => " PREDICT [p] ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_style(THEME.title_style())
        .borders(Borders::ALL)
        .border_style(THEME.border_style());

    let line = match &app.status {
        FormStatus::Idle => Line::styled(
            format!(
                "Press p to predict the {} inflation rate",
                app.target_year()
            ),
            THEME.inactive_style(),
        ),
        FormStatus::Predicted { line, .. } => Line::styled(line.clone(), THEME.success_style()),
        FormStatus::Failed(msg) => Line::styled(msg.clone(), THEME.error_style()),
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}
