//! Lesson and quiz content: the static catalog and the grader.

pub mod catalog;
pub mod grade;

pub use catalog::{Catalog, Lesson, Question, Quiz};
pub use grade::grade;
