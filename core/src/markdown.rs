//! Renders a [`Workout`] back into workout text.
//!
//! Loss-tolerant rather than byte-faithful: expanded set and circuit
//! replicas are emitted in their expanded form, and any rest becomes a
//! plain `Rest - M:SS` line. For workouts built from plain timed and reps
//! exercises the output re-parses to an equivalent workout.

use std::fmt::Write;

use crate::clock::format_clock;
use crate::model::{ExerciseKind, Workout};
use crate::parser::DEFAULT_REST_DESCRIPTION;

impl Workout {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        if !self.title.is_empty() {
            let _ = writeln!(out, "# {}", self.title);
            out.push('\n');
        }

        for ex in &self.exercises {
            match ex.kind {
                ExerciseKind::Timed => {
                    let _ = writeln!(
                        out,
                        "## {} - {}",
                        ex.name,
                        format_clock(ex.duration_secs.unwrap_or(0))
                    );
                }
                ExerciseKind::Reps => {
                    let _ = writeln!(out, "## {} - {} reps", ex.name, ex.target_reps.unwrap_or(1));
                }
                ExerciseKind::Rest => {
                    let _ = writeln!(
                        out,
                        "Rest - {}",
                        format_clock(ex.duration_secs.unwrap_or(0))
                    );
                }
            }
            // The default rest blurb comes back on its own when re-parsed.
            if !ex.description.is_empty() && ex.description != DEFAULT_REST_DESCRIPTION {
                for line in ex.description.lines() {
                    let _ = writeln!(out, "{line}");
                }
            }
            out.push('\n');
        }

        out
    }
}
