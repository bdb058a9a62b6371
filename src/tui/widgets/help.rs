//! Help overlay

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::theme::THEME;

const HELP: &[&str] = &[
    "Up/Down, Tab      move between fields",
    "0-9 . - e         type a value",
    "Backspace         delete a character",
    "Enter             commit the field",
    "Esc               discard the edit",
    "p, F5             predict",
    "r                 reset every field",
    "?                 toggle this help",
    "q, Ctrl+C         quit",
];

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 48, HELP.len() as u16 + 2);
    let block = Block::default()
        .title(" HELP ")
        .title_style(THEME.title_style())
        .borders(Borders::ALL)
        .border_style(THEME.border_style());

    let lines: Vec<Line> = HELP
        .iter()
        .map(|l| Line::styled(*l, THEME.label_style()))
        .collect();

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(mid);
    center
}
