//! Typed errors for the progress engine.
//!
//! Local, recoverable failures (the tutoring endpoint) are handled by retry
//! inside the client and never appear here. Structural failures are reported
//! immediately and never silently worked around.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    /// State file unreadable or unwritable. Fatal to the action.
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State document is not valid JSON for the current schema.
    #[error("state file {path} is not a valid progress document: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `last_interaction_time` matched neither recognized format.
    #[error("unrecognized interaction timestamp '{value}' (expected '%Y-%m-%d %H:%M:%S' or '%Y-%m-%d')")]
    Timestamp { value: String },

    /// Goal duration outside the allowed range. Rejected before any state mutation.
    #[error("goal duration must be between 1 and 30 days, got {days}")]
    GoalDuration { days: i64 },

    /// Submitted answers do not line up one-to-one with the quiz questions.
    #[error("expected {expected} answers, got {got}")]
    AnswerCount { expected: usize, got: usize },
}
