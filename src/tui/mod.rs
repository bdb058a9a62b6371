//! Terminal form for single predictions
//!
//! One numeric field per feature and a Predict trigger that shows the result line.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;


pub use app::{FormApp, FormField, FormStatus};
pub use event::KeyAction;
pub use theme::Theme;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self as term_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::predict::Predictor;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Apply one key action to the form.
///
/// Prediction failures are already reflected in `app.status`.
pub fn handle_action(app: &mut FormApp, action: KeyAction, predictor: &Predictor) {
    if app.show_help && !matches!(action, KeyAction::Quit | KeyAction::None) {
        app.toggle_help();
        return;
    }

    match action {
        KeyAction::Quit => app.quit(),
        KeyAction::Up => app.select_prev(),
        KeyAction::Down => app.select_next(),
        KeyAction::Input(c) => app.input_char(c),
        KeyAction::Backspace => app.backspace(),
        KeyAction::Commit => {
            if let Err(e) = app.commit_field() {
                app.status = FormStatus::Failed(e.to_string());
            }
        }
        KeyAction::Cancel => app.cancel_edit(),
        KeyAction::Predict => {
            let _ = app.trigger_predict(predictor);
        }
        KeyAction::Reset => app.reset(),
        KeyAction::Help => app.toggle_help(),
        KeyAction::None => {}
    }
}

/// Run the form until the user quits
pub fn run_form(mut app: FormApp, predictor: &Predictor) -> io::Result<()> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut app, predictor);
    restore_terminal()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut FormApp,
    predictor: &Predictor,
) -> io::Result<()> {
    while app.is_running() {
        terminal.draw(|f| ui::render(f, app))?;

        if term_event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = term_event::read()? {
                handle_action(app, KeyAction::from(key), predictor);
            }
        }
    }
    Ok(())
}
