//! Progress engine: learner state, streaks, badges, goals.
//!
//! All mutation goes through [`Tracker`], which runs the same flow the app
//! runs for every user action: observe the streak, apply the action, award
//! badges, persist the document.

pub mod badges;
pub mod goal;
pub mod store;
pub mod streak;
pub mod tracker;

pub use badges::Badge;
pub use goal::{LearningGoal, ScheduleStatus};
pub use store::{LearnerState, StateStore};
pub use streak::StreakChange;
pub use tracker::{QuizOutcome, Tracker};
