//! Parses workout text into a [`Workout`].
//!
//! The format is line-oriented markdown-ish. `# ` sets the title, `## ` and
//! `### ` introduce exercises, `Rest - M:SS` inserts a recovery interval and
//! anything else following a header becomes that exercise's description.
//! Parsing is all-or-nothing: one unrecognized header fails the whole text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::clock::parse_clock;
use crate::error::ParseError;
use crate::model::{CircuitStyle, Exercise, ExerciseKind, GroupInfo, Workout};

/// Description given to a bare `Rest - M:SS` line when no description
/// lines follow it.
pub const DEFAULT_REST_DESCRIPTION: &str = "Take a break and prepare for the next exercise";

static CIRCUIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(circle|circuit):\s*(\d+)\s+rounds?$").expect("circuit regex"));
static SETS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*-\s*(\d+)\s+sets\s+x\s+(\d+:\d{2})\s*/\s*(\d+:\d{2})$")
        .expect("sets regex")
});
static TIMED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*-\s*(\d+:\d{2})$").expect("timed regex"));
static REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s*-\s*(\d+)\s+reps?$").expect("reps regex"));
static REST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^rest\s*-\s*(\d+:\d{2})$").expect("rest regex"));

/// Parses a complete workout text. Returns the first error encountered;
/// no partial workout is ever produced.
pub fn parse(text: &str) -> Result<Workout, ParseError> {
    Parser::default().run(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderLevel {
    /// `## ` — can terminate a circuit block.
    Section,
    /// `### ` — always stays inside an open circuit block.
    Sub,
}

#[derive(Default)]
struct Parser {
    title: Option<String>,
    exercises: Vec<Exercise>,
    circuit: Option<CircuitBlock>,
    pending: Option<Pending>,
}

/// Exercises buffered after a `Circuit: N rounds` marker, replicated on close.
struct CircuitBlock {
    style: CircuitStyle,
    rounds: u32,
    buffer: Vec<Exercise>,
}

/// Description lines accumulated for the most recent header.
struct Pending {
    in_circuit: bool,
    /// Indices (into the buffer or the main sequence) receiving the text.
    targets: Vec<usize>,
    lines: Vec<String>,
}

impl Parser {
    fn run(mut self, text: &str) -> Result<Workout, ParseError> {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                // A blank line ends the current description block.
                self.flush_description();
            } else if let Some(header) = line.strip_prefix("### ") {
                self.header(header.trim(), HeaderLevel::Sub)?;
            } else if let Some(header) = line.strip_prefix("## ") {
                self.header(header.trim(), HeaderLevel::Section)?;
            } else if let Some(title) = line.strip_prefix("# ") {
                self.flush_description();
                // Only the first title line counts; later ones are skipped.
                if self.title.is_none() {
                    self.title = Some(title.trim().to_string());
                }
            } else if let Some(caps) = REST_RE.captures(line) {
                self.flush_description();
                let mut rest = Exercise::rest("Rest", clock_value(&caps, 1));
                rest.description = DEFAULT_REST_DESCRIPTION.to_string();
                self.push(vec![rest], vec![0]);
            } else {
                self.describe(line);
            }
        }

        self.flush_description();
        self.close_circuit();

        Ok(Workout {
            title: self.title.unwrap_or_default(),
            exercises: self.exercises,
        })
    }

    fn header(&mut self, text: &str, level: HeaderLevel) -> Result<(), ParseError> {
        self.flush_description();

        if let Some(caps) = CIRCUIT_RE.captures(text) {
            // A new marker closes any circuit still open.
            self.close_circuit();
            let style = if caps[1].eq_ignore_ascii_case("circle") {
                CircuitStyle::Circle
            } else {
                CircuitStyle::Circuit
            };
            let rounds = caps[2].parse().unwrap_or(0);
            self.circuit = Some(CircuitBlock {
                style,
                rounds,
                buffer: Vec::new(),
            });
            return Ok(());
        }

        // Circuits are assumed to end with a rest; a two-hash header right
        // after a buffered rest starts plain content again.
        if level == HeaderLevel::Section
            && self
                .circuit
                .as_ref()
                .is_some_and(|b| b.buffer.last().is_some_and(|ex| ex.kind == ExerciseKind::Rest))
        {
            self.close_circuit();
        }

        let (exercises, targets) = parse_exercise_header(text)?;
        self.push(exercises, targets);
        Ok(())
    }

    /// Appends exercises to the circuit buffer or the main sequence and
    /// points the description accumulator at `targets` within them.
    fn push(&mut self, exercises: Vec<Exercise>, targets: Vec<usize>) {
        let (dest, in_circuit) = match &mut self.circuit {
            Some(block) => (&mut block.buffer, true),
            None => (&mut self.exercises, false),
        };
        let base = dest.len();
        dest.extend(exercises);
        self.pending = Some(Pending {
            in_circuit,
            targets: targets.into_iter().map(|t| base + t).collect(),
            lines: Vec::new(),
        });
    }

    fn describe(&mut self, line: &str) {
        // Text with no preceding header has nothing to describe; skipped.
        if let Some(pending) = &mut self.pending {
            pending.lines.push(line.to_string());
        }
    }

    fn flush_description(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.lines.is_empty() {
            return;
        }
        let text = pending.lines.join("\n");
        let dest = if pending.in_circuit {
            match &mut self.circuit {
                Some(block) => &mut block.buffer,
                None => return,
            }
        } else {
            &mut self.exercises
        };
        for &index in &pending.targets {
            if let Some(ex) = dest.get_mut(index) {
                ex.description = text.clone();
            }
        }
    }

    /// Replicates the buffered block `rounds` times, round-major, and appends
    /// the replicas to the main sequence.
    fn close_circuit(&mut self) {
        let Some(block) = self.circuit.take() else {
            return;
        };
        for round in 1..=block.rounds {
            for ex in &block.buffer {
                let mut replica = ex.clone();
                replica.group = Some(GroupInfo::Round {
                    base: ex.name.clone(),
                    index: round,
                    total: block.rounds,
                    style: block.style,
                });
                replica.name = format!("Round {round}/{}: {}", block.rounds, ex.name);
                self.exercises.push(replica);
            }
        }
    }
}

/// Matches a header against the supported syntaxes, in priority order:
/// sets, timed, reps. Returns the produced exercises plus which of them
/// receive subsequent description lines.
fn parse_exercise_header(text: &str) -> Result<(Vec<Exercise>, Vec<usize>), ParseError> {
    if let Some(caps) = SETS_RE.captures(text) {
        let name = &caps[1];
        let total: u32 = caps[2].parse().unwrap_or(1);
        let total = total.max(1);
        let work_secs = clock_value(&caps, 3);
        let rest_secs = clock_value(&caps, 4);

        let mut out = Vec::new();
        let mut targets = Vec::new();
        for index in 1..=total {
            targets.push(out.len());
            let mut set = Exercise::timed(format!("{name} (Set {index}/{total})"), work_secs);
            set.group = Some(GroupInfo::Set {
                base: name.to_string(),
                index,
                total,
            });
            out.push(set);
            // No rest after the final set.
            if index < total {
                out.push(Exercise::rest("Rest between sets", rest_secs));
            }
        }
        return Ok((out, targets));
    }

    if let Some(caps) = TIMED_RE.captures(text) {
        let exercise = Exercise::timed(caps[1].to_string(), clock_value(&caps, 2));
        return Ok((vec![exercise], vec![0]));
    }

    if let Some(caps) = REPS_RE.captures(text) {
        let reps = caps[2].parse().unwrap_or(1);
        return Ok((vec![Exercise::reps(caps[1].to_string(), reps)], vec![0]));
    }

    Err(ParseError::MissingTimeFormat(text.to_string()))
}

///// Reads a `M:SS` capture group (shape guaranteed by the regexes above).
fn clock_value(caps: &Captures<'_>, group: usize) -> u32 {
    parse_clock(&caps[group]).unwrap_or(0)
}
