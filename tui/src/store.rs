//! On-disk workout library.
//!
//! Plain `.md` files under the config directory. Durability is best-effort:
//! callers surface save failures on the status line and carry on.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use takt_core::ValidationError;

/// Written on first run so the library view is never empty.
const SEED_WORKOUT: &str = "\
# Starter

## Warmup - 1:00
Loose shoulders, light bounce.

## Push-ups - 2 sets x 0:30 / 0:20

## Squats - 20 reps

Rest - 0:30

## Plank - 1:00
Back straight, eyes down.
";

pub struct WorkoutStore {
    dir: PathBuf,
    state_path: PathBuf,
}

/// Small bits of UI state carried between runs. Losing this file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    pub last_opened: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: Option<DateTime<Local>>,
}

impl WorkoutStore {
    pub fn open() -> color_eyre::Result<Self> {
        let base = config_dir();
        let dir = base.join("workouts");
        fs::create_dir_all(&dir).wrap_err("creating workout directory")?;
        Ok(Self {
            dir,
            state_path: base.join("state.json"),
        })
    }

    pub fn ensure_seed(&self) {
        if self.list().is_empty() {
            // Non-fatal: an empty library still works.
            let _ = self.save("starter", SEED_WORKOUT);
        }
    }

    pub fn list(&self) -> Vec<LibraryEntry> {
        let mut entries = Vec::new();
        let Ok(dir) = fs::read_dir(&self.dir) else {
            return entries;
        };
        for entry in dir.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "md") {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Local>::from);
            entries.push(LibraryEntry {
                name,
                path,
                modified,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    pub fn load(&self, path: &Path) -> std::io::Result<String> {
        fs::read_to_string(path)
    }

    /// Validates, then writes `<name>.md`. Returns the stored path.
    pub fn save(&self, name: &str, text: &str) -> color_eyre::Result<PathBuf> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        if text.trim().is_empty() {
            return Err(ValidationError::MissingContent.into());
        }
        let workout = takt_core::parse(text)?;
        if workout.is_empty() {
            return Err(ValidationError::NoExercises.into());
        }

        let path = self.dir.join(format!("{}.md", name.trim()));
        fs::write(&path, text).wrap_err("writing workout file")?;
        Ok(path)
    }

    pub fn load_state(&self) -> StoredState {
        fs::read_to_string(&self.state_path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Best-effort; a failed write only loses a convenience.
    pub fn save_state(&self, state: &StoredState) {
        if let Ok(data) = serde_json::to_string_pretty(state) {
            let _ = fs::write(&self.state_path, data);
        }
    }
}

fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .map(|p| p.join("takt"))
        .unwrap_or_else(|| PathBuf::from("."))
}
