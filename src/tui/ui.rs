//! UI rendering for the TUI.
//!
//! The task rows, the detail panel and the status bar are drawn from one
//! snapshot taken at the start of the frame.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::Clock;
use crate::features::timer::{format_minutes_short, Controls, TimerSnapshot, TimerState};
use crate::notify::NoticeKind;
use crate::tui::app::App;

/// Render the application UI.
pub fn render<C: Clock>(frame: &mut Frame<'_>, app: &App<C>) {
    let snapshot = app.snapshot();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Tasks and detail
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    render_tasks(frame, app, &snapshot, columns[0]);
    render_detail(frame, app, &snapshot, columns[1]);
    render_status_bar(frame, app, &snapshot, rows[1]);
}

fn controls_color(controls: Controls) -> Color {
    match controls {
        Controls::Start => Color::DarkGray,
        Controls::PauseOrStop => Color::Green,
        Controls::ResumeOrStop => Color::Yellow,
    }
}

/// Task rows with their timer controls.
fn render_tasks<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, snapshot: &TimerSnapshot, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let controls = app.controls_for(snapshot, subject);
            let is_selected = i == app.selected;

            let mut spans = vec![
                Span::styled(
                    format!("{} ", controls.icon()),
                    Style::default().fg(controls_color(controls)),
                ),
                Span::styled(
                    subject.as_str(),
                    Style::default().add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
            ];

            if controls != Controls::Start {
                spans.push(Span::styled(
                    format!("  {}", snapshot.clock()),
                    Style::default().fg(Color::Cyan),
                ));
            }

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Tasks ({}) ", app.subjects.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Detail panel for the selected task.
fn render_detail<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, snapshot: &TimerSnapshot, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let Some(subject) = app.selected_subject() else {
        let empty = Paragraph::new("No tasks. Run `docket tui <task>` to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let controls = app.controls_for(snapshot, subject);
    let (state, clock) = if snapshot.is_for(subject) {
        (snapshot.state, snapshot.clock())
    } else {
        (TimerState::Idle, "--:--:--".to_string())
    };
    let saved = app.totals.get(subject).copied().unwrap_or(0);

    let lines = vec![
        Line::from(Span::styled(
            subject,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("State:   ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.to_string(), Style::default().fg(controls_color(controls))),
        ]),
        Line::from(vec![
            Span::styled("Elapsed: ", Style::default().fg(Color::DarkGray)),
            Span::styled(clock, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Saved:   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_minutes_short(saved)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Actions: ", Style::default().fg(Color::DarkGray)),
            Span::raw(controls.labels().join(" | ")),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), parts[0]);

    if controls != Controls::Start {
        let color = if app.is_warned() { Color::Red } else { Color::Green };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(app.progress(snapshot))
            .label("of 6h limit");
        frame.render_widget(gauge, parts[1]);
    }
}

/// Global status bar: the active timer, or the latest message.
fn render_status_bar<C: Clock>(frame: &mut Frame<'_>, app: &App<C>, snapshot: &TimerSnapshot, area: Rect) {
    let mut spans = Vec::new();

    match &snapshot.subject_id {
        Some(subject) => {
            let color = if snapshot.state == TimerState::Paused {
                Color::Yellow
            } else {
                Color::Green
            };
            spans.push(Span::styled(
                format!(" {} {subject} {} ", snapshot.state, snapshot.clock()),
                Style::default().fg(Color::Black).bg(color),
            ));
        }
        None => spans.push(Span::styled(" idle ", Style::default().fg(Color::DarkGray))),
    }

    if app.unsaved() > 0 {
        spans.push(Span::styled(
            format!(" {} unsaved ", app.unsaved()),
            Style::default().fg(Color::White).bg(Color::Red),
        ));
    }

    if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" {status}"), Style::default().fg(Color::DarkGray)));
    } else if let Some(notice) = &app.last_notice {
        let color = match notice.kind {
            NoticeKind::Warning => Color::Yellow,
            NoticeKind::AutoStopped => Color::Magenta,
            NoticeKind::Error => Color::Red,
        };
        spans.push(Span::styled(format!(" {}", notice.message), Style::default().fg(color)));
    } else {
        spans.push(Span::styled(
            " s:start | p:pause | x:stop | ?:help | q:quit",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Paths};
    use crate::context::TimerContext;
    use crate::core::ManualClock;
    use crate::notify::NoticeLog;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_all_panels_show_running_timer() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        let clock = ManualClock::new(1_700_000_000_000);
        let log = NoticeLog::new();
        let ctx =
            TimerContext::open_with_clock(&paths, &Config::default(), log.clone(), clock.clone())
                .unwrap();
        let mut app = App::new(ctx, log, vec!["task-a".to_string()]).unwrap();

        app.start_selected().unwrap();
        clock.advance(65_000);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        // Row, detail and status bar each show the same clock
        assert_eq!(text.matches("00:01:05").count(), 3);
        assert!(text.contains("pause | stop"));
    }
}
