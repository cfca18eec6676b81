//! Workout parsing and execution for takt.
//!
//! The pipeline: workout text goes through [`parser::parse`] into an ordered
//! [`model::Workout`], a [`session::WorkoutSession`] drives that sequence
//! exercise by exercise, and [`timer::TimerEngine`] handles the countdown
//! for the current one. Frontends sit on top of the session's operations
//! and accessors; nothing in here touches the filesystem or a terminal.

pub mod clock;
pub mod error;
pub mod markdown;
pub mod model;
pub mod parser;
pub mod session;
pub mod timer;

pub use clock::{format_clock, parse_clock};
pub use error::{ParseError, ValidationError};
pub use model::{CircuitStyle, Exercise, ExerciseKind, GroupInfo, Workout};
pub use parser::parse;
pub use session::{RunState, SessionEvent, WorkoutSession};
pub use timer::{TimerEngine, TimerEvent, TimerState};
