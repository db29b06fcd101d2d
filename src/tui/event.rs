//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Clock;
use crate::error::DocketError;
use crate::tui::app::App;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Reload task rows.
    Refresh,
    /// Start timing the selected task.
    Start,
    /// Pause or resume the timer.
    TogglePause,
    /// Stop the timer and save the entry.
    Stop,
}

/// Wait up to `timeout` for a key and handle it.
///
/// Returns an action to take, or None if no action is needed. Returning on
/// timeout keeps the clock redrawing while no keys are pressed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<C: Clock>(app: &mut App<C>, timeout: Duration) -> Result<Option<Action>, DocketError> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(app, key)),
        _ => Ok(None),
    }
}

fn handle_key<C: Clock>(app: &mut App<C>, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if key.code == KeyCode::Char('g') {
        app.handle_g();
        return None;
    }
    app.cancel_pending();

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            None
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.select_last();
            None
        }
        KeyCode::Home => {
            app.select_first();
            None
        }

        KeyCode::Char('s') | KeyCode::Enter => Some(Action::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('r') => Some(Action::Refresh),

        KeyCode::Char('?') => {
            app.status = Some(
                "j/k:nav | s:start | p:pause/resume | x:stop | r:refresh | q:quit".to_string(),
            );
            None
        }

        _ => None,
    }
}
