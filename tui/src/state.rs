//! Application state.

use std::path::Path;
use std::time::Instant;

use takt_core::{RunState, SessionEvent, WorkoutSession, parse};

use crate::audio::Cues;
use crate::store::{LibraryEntry, StoredState, WorkoutStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Session,
}

pub struct App {
    pub running: bool,
    pub view: View,
    pub entries: Vec<LibraryEntry>,
    pub selected: usize,
    pub active: Option<ActiveWorkout>,
    pub status: String,
    store: WorkoutStore,
    audio: Cues,
}

pub struct ActiveWorkout {
    /// File name shown in the session header.
    pub source: String,
    pub session: WorkoutSession,
}

impl App {
    pub fn new(file: Option<&Path>, mute: bool) -> color_eyre::Result<Self> {
        let store = WorkoutStore::open()?;
        store.ensure_seed();

        let mut app = Self {
            running: true,
            view: View::Library,
            entries: Vec::new(),
            selected: 0,
            active: None,
            status: String::new(),
            store,
            audio: Cues::new(!mute),
        };
        app.refresh_library();

        // Put the cursor back on whatever was open last time.
        if let Some(last) = app.store.load_state().last_opened
            && let Some(i) = app.entries.iter().position(|e| e.name == last)
        {
            app.selected = i;
        }

        if let Some(path) = file {
            app.open_path(path);
        }

        Ok(app)
    }

    /// Drives the active countdown; called on every UI tick.
    pub fn tick(&mut self, now: Instant) {
        let Some(active) = &mut self.active else {
            return;
        };
        let events = active.session.poll(now);
        self.handle_events(&events);
    }

    // Library -----------------------------------------------------------

    pub fn refresh_library(&mut self) {
        self.entries = self.store.list();
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn select(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as i32;
        self.selected = (self.selected as i32 + delta).clamp(0, len - 1) as usize;
    }

    pub fn open_selected(&mut self) {
        if let Some(entry) = self.entries.get(self.selected) {
            let path = entry.path.clone();
            self.open_path(&path);
        }
    }

    pub fn open_path(&mut self, path: &Path) {
        let text = match self.store.load(path) {
            Ok(text) => text,
            Err(e) => {
                self.status = format!("Load error: {e}");
                return;
            }
        };
        match parse(&text) {
            Ok(workout) => {
                let source = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.status = format!("{} exercises, space to start", workout.len());
                self.store.save_state(&StoredState {
                    last_opened: Some(source.clone()),
                });
                self.active = Some(ActiveWorkout {
                    source,
                    session: WorkoutSession::new(workout),
                });
                self.view = View::Session;
            }
            Err(e) => self.status = format!("Parse error: {e}"),
        }
    }

    pub fn close_session(&mut self) {
        self.active = None;
        self.view = View::Library;
        self.status.clear();
        self.refresh_library();
    }

    // Session controls ---------------------------------------------------

    pub fn toggle_start_pause(&mut self, now: Instant) {
        let Some(active) = &mut self.active else {
            return;
        };
        match active.session.run_state() {
            RunState::Idle => {
                active.session.start(now);
                self.status = "Go".to_string();
            }
            RunState::Running => {
                active.session.pause(now);
                if active.session.run_state() == RunState::Paused {
                    self.status = "Paused".to_string();
                }
            }
            RunState::Paused => {
                active.session.resume(now);
                self.status = "Go".to_string();
            }
            RunState::Completed => {
                self.status = "Workout complete; r to restart".to_string();
            }
        }
    }

    pub fn skip(&mut self, now: Instant) {
        let Some(active) = &mut self.active else {
            return;
        };
        let events = active.session.skip(now);
        self.handle_events(&events);
    }

    pub fn complete_reps(&mut self, now: Instant) {
        let Some(active) = &mut self.active else {
            return;
        };
        let events = active.session.complete_reps(now);
        self.handle_events(&events);
    }

    pub fn reset_session(&mut self) {
        if let Some(active) = &mut self.active {
            active.session.reset();
            self.status = "Reset, space to start".to_string();
        }
    }

    // Events -------------------------------------------------------------

    fn handle_events(&mut self, events: &[SessionEvent]) {
        if events.is_empty() {
            return;
        }

        if events.contains(&SessionEvent::WorkoutFinished) {
            self.audio.workout_complete();
            self.status = "Workout complete".to_string();
            return;
        }

        self.audio.exercise_complete();
        if let Some(active) = &self.active
            && let Some(ex) = active.session.current()
        {
            self.status = format!("Up next: {}", ex.name);
        }
    }
}
