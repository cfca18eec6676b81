//! Error types shared between the core and its callers.

use thiserror::Error;

/// Parsing is all-or-nothing: any of these aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An exercise header matched none of the supported syntaxes.
    /// Carries the raw header text for the user-facing message.
    #[error("Exercise \"{0}\" is missing time format")]
    MissingTimeFormat(String),
    /// A clock value was not `minutes:seconds` with two-digit seconds.
    #[error("invalid clock value \"{0}\"")]
    InvalidClock(String),
}

/// Caller-level pre-checks before a workout is stored or executed.
/// The parser itself never raises these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("workout name is required")]
    MissingName,
    #[error("workout text is required")]
    MissingContent,
    #[error("workout must contain at least one exercise")]
    NoExercises,
}
