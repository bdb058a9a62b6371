//! Input fields panel
//!
//! One row per feature: label on the left, value box on the right.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::tui::app::FormApp;
use crate::tui::theme::THEME;

/// Render the field list, scrolled so the selected field is visible
pub fn render_fields(f: &mut Frame, area: Rect, app: &FormApp) {
    let block = Block::default()
        .title(format!(" INPUTS ({}) ", app.fields.len()))
        .title_style(THEME.title_style())
        .borders(Borders::ALL)
        .border_style(THEME.border_style());

    let items: Vec<ListItem> = app
        .fields
        .iter()
        .map(|field| {
            let marker = if field.is_editing() { "*" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>6} ", field.name), THEME.label_style()),
                Span::styled("[", THEME.inactive_style()),
                Span::styled(
                    format!("{:>14}", field.display()),
                    THEME.value_style(field.is_editing()),
                ),
                Span::styled("]", THEME.inactive_style()),
                Span::styled(marker, THEME.value_style(true)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(THEME.selected_style())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}
