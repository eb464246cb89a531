//! Learner state store - a single JSON document, rewritten wholesale.
//!
//! The document lives at one path per install. Optional fields absent from
//! older documents (`badges`, `learning_goal`, `quiz_scores`) load as empty
//! containers, so the schema can only grow.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProgressError;
use crate::progress::badges::Badge;
use crate::progress::goal::LearningGoal;

/// Format used when writing `last_interaction_time`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The whole persisted learner document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerState {
    /// Lesson ids in completion order, duplicate-free.
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    /// Quiz id -> score. A score is bounded by that quiz's question count.
    #[serde(default)]
    pub quiz_scores: BTreeMap<String, u32>,
    /// Serialized as `%Y-%m-%d %H:%M:%S`; a bare `%Y-%m-%d` is accepted on parse.
    pub last_interaction_time: String,
    #[serde(default = "default_streak")]
    pub streak_count: u32,
    /// Append-only. A badge is never removed and never duplicated.
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub learning_goal: Option<LearningGoal>,
}

fn default_streak() -> u32 {
    1
}

impl LearnerState {
    /// Fresh state for a first run.
    pub fn fresh(now: NaiveDateTime) -> Self {
        Self {
            completed_lessons: Vec::new(),
            quiz_scores: BTreeMap::new(),
            last_interaction_time: now.format(TIMESTAMP_FORMAT).to_string(),
            streak_count: 1,
            badges: Vec::new(),
            learning_goal: None,
        }
    }

    /// Record a lesson as completed. Returns false if it already was.
    pub fn mark_lesson_completed(&mut self, lesson_id: &str) -> bool {
        if self.completed_lessons.iter().any(|l| l == lesson_id) {
            return false;
        }
        self.completed_lessons.push(lesson_id.to_string());
        true
    }

    /// Record (or overwrite) a quiz score.
    pub fn record_quiz_score(&mut self, quiz_id: &str, score: u32) {
        self.quiz_scores.insert(quiz_id.to_string(), score);
    }

    pub fn has_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|l| l == lesson_id)
    }
}

/// Loads and saves the learner document at a fixed path.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Open a store at the given path, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProgressError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ProgressError::Io {
                path: path.clone(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    /// Read the persisted state, or synthesize and persist defaults on first run.
    pub fn load(&self) -> Result<LearnerState, ProgressError> {
        if !self.path.exists() {
            let state = LearnerState::fresh(Local::now().naive_local());
            self.save(&state)?;
            info!("initialized learner state at {}", self.path.display());
            return Ok(state);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| ProgressError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut state: LearnerState =
            serde_json::from_str(&contents).map_err(|source| ProgressError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        // The streak invariant holds even for documents written by hand.
        state.streak_count = state.streak_count.max(1);
        Ok(state)
    }

    /// Atomic full rewrite: write a sibling temp file, then rename over the document.
    pub fn save(&self, state: &LearnerState) -> Result<(), ProgressError> {
        let json =
            serde_json::to_string_pretty(state).map_err(|source| ProgressError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| ProgressError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| ProgressError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("saved learner state to {}", self.path.display());
        Ok(())
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> StateStore {
        StateStore::open(dir.path().join("progress.json")).unwrap()
    }

    #[test]
    fn test_first_run_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let state = store.load().unwrap();
        assert!(state.completed_lessons.is_empty());
        assert!(state.quiz_scores.is_empty());
        assert!(state.badges.is_empty());
        assert!(state.learning_goal.is_none());
        assert_eq!(state.streak_count, 1);
        // The document should have been persisted
        assert!(store.path().exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut state = store.load().unwrap();
        assert!(state.mark_lesson_completed("loops"));
        assert!(!state.mark_lesson_completed("loops"), "no duplicates");
        state.record_quiz_score("loops", 3);
        state.streak_count = 4;
        store.save(&state).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.completed_lessons, vec!["loops"]);
        assert_eq!(reloaded.quiz_scores.get("loops"), Some(&3));
        assert_eq!(reloaded.streak_count, 4);
    }

    #[test]
    fn test_legacy_document_backfills_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        // A document written before badges, goals, and quiz scores existed
        std::fs::write(
            &path,
            r#"{"completed_lessons": ["intro-to-python"], "last_interaction_time": "2024-03-01 09:30:00", "streak_count": 2}"#,
        )
        .unwrap();

        let store = StateStore::open(&path).unwrap();
        let state = store.load().unwrap();
        assert_eq!(state.completed_lessons, vec!["intro-to-python"]);
        assert_eq!(state.streak_count, 2);
        assert!(state.badges.is_empty());
        assert!(state.quiz_scores.is_empty());
        assert!(state.learning_goal.is_none());
    }

    #[test]
    fn test_streak_clamped_to_one_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(
            &path,
            r#"{"last_interaction_time": "2024-03-01", "streak_count": 0}"#,
        )
        .unwrap();

        let state = StateStore::open(&path).unwrap().load().unwrap();
        assert_eq!(state.streak_count, 1);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StateStore::open(&path).unwrap().load().unwrap_err();
        assert!(matches!(err, ProgressError::Malformed { .. }));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let state = store.load().unwrap();
        store.save(&state).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["progress.json"]);
    }
}
