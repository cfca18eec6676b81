//! UI rendering.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph},
};
use takt_core::{ExerciseKind, RunState, format_clock};

use crate::state::{ActiveWorkout, App, View};

const LIBRARY_HINTS: &str = "↑/↓: select • Enter: open • r: refresh • q: quit";
const SESSION_HINTS: &str = "space: start/pause • n: skip • Enter: reps done • r: reset • q: back";

pub fn render(app: &App, frame: &mut Frame) {
    match app.view {
        View::Library => render_library(app, frame),
        View::Session => match &app.active {
            Some(active) => render_session(app, active, frame),
            None => render_library(app, frame),
        },
    }
}

// Library -----------------------------------------------------------------

fn render_library(app: &App, frame: &mut Frame) {
    let [header, list, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(frame.area());

    let title = Paragraph::new(Line::from("takt").bold().cyan())
        .alignment(Alignment::Center)
        .block(Block::bordered());
    frame.render_widget(title, header);

    let mut lines = Vec::new();
    if app.entries.is_empty() {
        lines.push(Line::from("No workouts found".dim()));
    }
    for (i, entry) in app.entries.iter().enumerate() {
        let marker = if i == app.selected { "> " } else { "  " };
        let date = entry
            .modified
            .map(|m| m.format("%b %e %H:%M").to_string())
            .unwrap_or_default();
        let mut line = Line::from(vec![
            Span::raw(marker),
            Span::raw(entry.name.clone()),
            Span::raw("  "),
            Span::styled(date, Style::default().dim()),
        ]);
        if i == app.selected {
            line = line.bold().green();
        }
        lines.push(line);
    }
    let list_widget = Paragraph::new(lines).block(Block::bordered().title(" Workouts "));
    frame.render_widget(list_widget, list);

    render_footer(frame, footer, &app.status, LIBRARY_HINTS);
}

// Session -----------------------------------------------------------------

fn render_session(app: &App, active: &ActiveWorkout, frame: &mut Frame) {
    let now = Instant::now();
    let session = &active.session;

    let [header, gauge_area, main, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(4),
    ])
    .areas(frame.area());

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);

    render_session_header(frame, header, active);
    render_gauge(frame, gauge_area, session.progress(now));
    render_exercise_list(frame, list_area, session);
    render_current(frame, detail_area, session);
    render_footer(frame, footer, &app.status, SESSION_HINTS);
}

fn render_session_header(frame: &mut Frame, area: Rect, active: &ActiveWorkout) {
    let session = &active.session;
    let title = if session.workout().title.is_empty() {
        active.source.clone()
    } else {
        session.workout().title.clone()
    };

    let badge = match session.run_state() {
        RunState::Idle => Span::raw("ready").dim(),
        RunState::Running => Span::raw("running").green().bold(),
        RunState::Paused => Span::raw("paused").yellow().bold(),
        RunState::Completed => Span::raw("done").cyan().bold(),
    };

    let line = Line::from(vec![Span::raw(title).bold(), Span::raw("  "), badge]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        area,
    );
}

fn render_gauge(frame: &mut Frame, area: Rect, progress: f64) {
    let gauge = Gauge::default()
        .block(Block::bordered())
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{progress:.0}%"));
    frame.render_widget(gauge, area);
}

fn render_exercise_list(frame: &mut Frame, area: Rect, session: &takt_core::WorkoutSession) {
    let mut lines = Vec::new();
    for (i, ex) in session.workout().exercises.iter().enumerate() {
        let mark = if session.exercise_completed(i) {
            "✓"
        } else {
            " "
        };
        let extent = match ex.kind {
            ExerciseKind::Reps => format!("{} reps", ex.target_reps.unwrap_or(1)),
            _ => format_clock(ex.duration_secs.unwrap_or(0)),
        };
        let mut line = Line::from(vec![
            Span::raw(format!("{mark} ")),
            Span::raw(ex.name.clone()),
            Span::raw("  "),
            Span::styled(extent, Style::default().dim()),
        ]);
        if i == session.cursor() {
            line = line.bold().green();
        } else if session.exercise_completed(i) {
            line = line.dim();
        }
        lines.push(line);
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Exercises ")),
        area,
    );
}

fn render_current(frame: &mut Frame, area: Rect, session: &takt_core::WorkoutSession) {
    let mut lines = Vec::new();

    if session.is_complete() {
        lines.push(Line::from(""));
        lines.push(Line::from("Workout complete").bold().cyan());
        lines.push(Line::from(""));
        lines.push(Line::from("r to go again, q for the library").dim());
    } else if let Some(ex) = session.current() {
        lines.push(Line::from(ex.name.clone()).bold());
        lines.push(Line::from(""));
        match ex.kind {
            ExerciseKind::Timed | ExerciseKind::Rest => {
                lines.push(
                    Line::from(format_clock(session.time_remaining()))
                        .bold()
                        .green(),
                );
                lines.push(
                    Line::from(format!("of {}", format_clock(ex.duration_secs.unwrap_or(0))))
                        .dim(),
                );
            }
            ExerciseKind::Reps => {
                lines.push(
                    Line::from(format!("{} reps", ex.target_reps.unwrap_or(1)))
                        .bold()
                        .green(),
                );
                lines.push(Line::from("Enter when done").dim());
            }
        }
        if !ex.description.is_empty() {
            lines.push(Line::from(""));
            for text in ex.description.lines() {
                lines.push(Line::from(text.to_string()));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Current ")),
        area,
    );
}

// Shared ------------------------------------------------------------------

fn render_footer(frame: &mut Frame, area: Rect, status: &str, hints: &str) {
    let lines = vec![
        Line::from(status.to_string()),
        Line::from(hints.to_string()).dim(),
    ];
    frame.render_widget(Paragraph::new(lines).block(Block::bordered()), area);
}
