//! Workout timer TUI.

mod audio;
mod state;
mod store;
mod ui;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use state::{App, View};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Sub-second poll cadence; whole-second countdown accuracy comes from the
/// engine's wall-clock bookkeeping, not from this rate.
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "takt", version, about = "Terminal workout timer")]
struct Args {
    /// Workout file to open directly, skipping the library view.
    file: Option<PathBuf>,

    /// Disable terminal-bell cues.
    #[arg(long)]
    mute: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut app = App::new(args.file.as_deref(), args.mute)?;

    let mut terminal = ratatui::init();
    let result = run(&mut app, &mut terminal);
    ratatui::restore();

    result
}

fn run(app: &mut App, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
    while app.running {
        app.tick(Instant::now());

        terminal.draw(|f| ui::render(app, f))?;

        if event::poll(TICK_RATE)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let now = Instant::now();
            match app.view {
                View::Library => handle_library_key(app, key.code, key.modifiers),
                View::Session => handle_session_key(app, now, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_library_key(app: &mut App, code: KeyCode, mods: KeyModifiers) {
    use KeyCode::*;

    match code {
        Esc | Char('q') => app.running = false,
        Char('c') if mods.contains(KeyModifiers::CONTROL) => app.running = false,

        Down | Char('j') => app.select(1),
        Up | Char('k') => app.select(-1),
        Enter => app.open_selected(),
        Char('r') => app.refresh_library(),

        _ => {}
    }
}

fn handle_session_key(app: &mut App, now: Instant, code: KeyCode, mods: KeyModifiers) {
    use KeyCode::*;

    match code {
        Char('c') if mods.contains(KeyModifiers::CONTROL) => app.running = false,
        Esc | Char('q') => app.close_session(),

        Char(' ') => app.toggle_start_pause(now),
        Char('n') => app.skip(now),
        Enter => app.complete_reps(now),
        Char('r') => app.reset_session(),

        _ => {}
    }
}
