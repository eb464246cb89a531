//! Codetutor - Interactive Programming Tutor Library
//!
//! A single-user learning assistant with:
//! - A built-in lesson catalog and multiple-choice quizzes
//! - Daily streaks, achievement badges, and learning goals
//! - A flat-file JSON progress store with additive schema evolution
//! - Free-text tutoring via a local Ollama-compatible endpoint
//!
//! # Example
//!
//! ```ignore
//! use codetutor::{Catalog, StateStore, Tracker};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = StateStore::open(codetutor::config::state_path()?)?;
//!     let mut tracker = Tracker::open(store, Catalog::builtin()?)?;
//!     let badges = tracker.complete_lesson("intro-to-python")?;
//!     println!("earned: {:?}", badges);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod progress;
pub mod tutor;

// Re-export commonly used types for convenience
pub use config::Config;
pub use content::{grade, Catalog, Lesson, Question, Quiz};
pub use error::ProgressError;
pub use progress::{
    Badge, LearnerState, LearningGoal, QuizOutcome, ScheduleStatus, StateStore, StreakChange,
    Tracker,
};
pub use tutor::{TutorClient, TutorReply};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
