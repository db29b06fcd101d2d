//! Terminal User Interface (TUI) for docket.
//!
//! Shows task rows, a detail panel and a status bar that all follow the one
//! timer. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::{Config, Paths};
use crate::context::TimerContext;
use crate::core::Clock;
use crate::error::DocketError;
use crate::notify::{DesktopNotifier, NoticeLog, Notifier};

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the timer cannot be loaded or the terminal fails.
pub fn run(paths: &Paths, config: &Config, subjects: Vec<String>) -> Result<(), DocketError> {
    let notices = NoticeLog::new();
    let ctx = TimerContext::open(paths, config, notices.clone())?;
    let mut app = App::new(ctx, notices, subjects)?;
    let desktop = config.notifications.desktop.then_some(DesktopNotifier);
    let tick = Duration::from_millis(config.timer.tick_ms.max(1));

    enable_raw_mode().map_err(|e| DocketError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| DocketError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| DocketError::Config(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app, tick, &desktop);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_app<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    tick: Duration,
    desktop: &Option<DesktopNotifier>,
) -> Result<(), DocketError> {
    loop {
        app.tick()?;
        if let Some(notice) = app.take_fresh_notice() {
            desktop.notify(&notice);
        }

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| DocketError::Config(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app, tick)? {
            match action {
                event::Action::Quit => break,
                event::Action::Refresh => app.refresh()?,
                event::Action::Start => app.start_selected()?,
                event::Action::TogglePause => app.toggle_pause()?,
                event::Action::Stop => app.stop()?,
            }
        }
    }

    Ok(())
}
