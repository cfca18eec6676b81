//! Workout and exercise definitions.
//!
//! A [`Workout`] is produced once by the parser and is structurally immutable
//! afterwards. Execution progress (completed flags, cursor) lives in
//! [`crate::session::WorkoutSession`], never on the parsed data.

use serde::{Deserialize, Serialize};

/// How an exercise completes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Countdown runs for a fixed duration.
    Timed,
    /// The user signals completion explicitly; the rep target is display-only.
    Reps,
    /// A recovery interval. Executes exactly like `Timed`.
    Rest,
}

impl ExerciseKind {
    /// Whether this kind is driven by the countdown timer.
    pub fn is_timed(self) -> bool {
        matches!(self, ExerciseKind::Timed | ExerciseKind::Rest)
    }
}

/// Which keyword opened a circuit block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStyle {
    Circle,
    Circuit,
}

/// Tags an exercise that came out of a sets or circuit expansion.
///
/// Descriptive only: expansion already bakes the set/round decoration into
/// the display name, execution never looks at this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupInfo {
    Set {
        base: String,
        index: u32,
        total: u32,
    },
    Round {
        base: String,
        index: u32,
        total: u32,
        style: CircuitStyle,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub kind: ExerciseKind,
    /// Present exactly when `kind` is `Timed` or `Rest`.
    pub duration_secs: Option<u32>,
    /// Present exactly when `kind` is `Reps`, always >= 1.
    pub target_reps: Option<u32>,
    /// Free text, possibly empty; source lines joined with `\n`.
    pub description: String,
    pub group: Option<GroupInfo>,
}

impl Exercise {
    pub fn timed(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Timed,
            duration_secs: Some(duration_secs),
            target_reps: None,
            description: String::new(),
            group: None,
        }
    }

    pub fn reps(name: impl Into<String>, target_reps: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Reps,
            duration_secs: None,
            target_reps: None,
            description: String::new(),
            group: None,
        }
        .with_reps(target_reps)
    }

    pub fn rest(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Rest,
            duration_secs: Some(duration_secs),
            target_reps: None,
            description: String::new(),
            group: None,
        }
    }

    fn with_reps(mut self, target_reps: u32) -> Self {
        self.target_reps = Some(target_reps.max(1));
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub title: String,
    /// Execution order; never reordered after parsing.
    pub exercises: Vec<Exercise>,
}

impl Workout {
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }
}
