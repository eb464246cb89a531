//! The per-action progress flow.
//!
//! Every user action runs the same pipeline: observe the streak, apply the
//! mutation, re-evaluate badges, persist. [`Tracker`] owns the state, the
//! store, and the catalog so callers never juggle raw documents.

use anyhow::{bail, Result};
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::content::{grade, Catalog};
use crate::progress::badges::{self, Badge};
use crate::progress::goal::{self, LearningGoal, ScheduleStatus};
use crate::progress::store::{LearnerState, StateStore};
use crate::progress::streak::{self, StreakChange};

/// Result of a quiz submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: u32,
    pub total: u32,
    pub new_badges: Vec<Badge>,
}

impl QuizOutcome {
    /// Encouragement tier: perfect, at least half, or below half.
    pub fn feedback(&self) -> &'static str {
        if self.score == self.total {
            "Great job! You can move to a higher difficulty level."
        } else if self.score >= self.total / 2 {
            "Good work! Keep practicing to improve."
        } else {
            "Don't worry! Review the lesson and try again."
        }
    }
}

/// Owns the learner state and applies every action to it.
pub struct Tracker {
    store: StateStore,
    catalog: Catalog,
    state: LearnerState,
}

impl Tracker {
    /// Load (or initialize) the state behind `store`.
    pub fn open(store: StateStore, catalog: Catalog) -> Result<Self> {
        let state = store.load()?;
        Ok(Self {
            store,
            catalog,
            state,
        })
    }

    pub fn state(&self) -> &LearnerState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Record a plain interaction (opening the app counts for the streak).
    pub fn touch(&mut self) -> Result<StreakChange> {
        self.touch_at(Local::now().naive_local())
    }

    pub fn touch_at(&mut self, now: NaiveDateTime) -> Result<StreakChange> {
        let change = streak::observe(&mut self.state, now)?;
        badges::award(&mut self.state, &self.catalog);
        self.store.save(&self.state)?;
        Ok(change)
    }

    /// Mark a lesson completed. Returns badges earned by this action.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> Result<Vec<Badge>> {
        self.complete_lesson_at(lesson_id, Local::now().naive_local())
    }

    pub fn complete_lesson_at(
        &mut self,
        lesson_id: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<Badge>> {
        if self.catalog.lesson(lesson_id).is_none() {
            bail!("unknown lesson '{}'", lesson_id);
        }

        streak::observe(&mut self.state, now)?;
        if self.state.mark_lesson_completed(lesson_id) {
            info!("lesson completed: {}", lesson_id);
        }
        if let Some(goal) = self.state.learning_goal.as_mut() {
            if goal.lesson_plan.iter().any(|l| l == lesson_id)
                && !goal.completed_lessons.iter().any(|l| l == lesson_id)
            {
                goal.completed_lessons.push(lesson_id.to_string());
            }
        }
        let new_badges = badges::award(&mut self.state, &self.catalog);
        self.store.save(&self.state)?;
        Ok(new_badges)
    }

    /// Whether the quiz's prerequisite lesson (if any) has been completed.
    pub fn quiz_unlocked(&self, quiz_id: &str) -> bool {
        match self.catalog.quiz(quiz_id).and_then(|q| q.lesson.as_ref()) {
            Some(lesson_id) => self.state.has_completed(lesson_id),
            None => true,
        }
    }

    /// Grade a quiz submission and record the score.
    pub fn submit_quiz(&mut self, quiz_id: &str, answers: &[String]) -> Result<QuizOutcome> {
        self.submit_quiz_at(quiz_id, answers, Local::now().naive_local())
    }

    pub fn submit_quiz_at(
        &mut self,
        quiz_id: &str,
        answers: &[String],
        now: NaiveDateTime,
    ) -> Result<QuizOutcome> {
        let Some(quiz) = self.catalog.quiz(quiz_id) else {
            bail!("unknown quiz '{}'", quiz_id);
        };
        if let Some(lesson_id) = &quiz.lesson {
            if !self.state.has_completed(lesson_id) {
                bail!(
                    "complete the lesson '{}' before taking this quiz",
                    lesson_id
                );
            }
        }

        // Grade before mutating anything; a bad submission leaves no trace.
        let score = grade(&quiz.questions, answers)?;
        let total = quiz.max_score();

        streak::observe(&mut self.state, now)?;
        self.state.record_quiz_score(quiz_id, score);
        info!("quiz '{}' scored {}/{}", quiz_id, score, total);
        let new_badges = badges::award(&mut self.state, &self.catalog);
        self.store.save(&self.state)?;

        Ok(QuizOutcome {
            score,
            total,
            new_badges,
        })
    }

    /// Set (or replace) the learning goal. The lesson plan is snapshotted
    /// from the catalog and the goal's own checklist starts empty.
    pub fn set_goal(&mut self, description: &str, duration_days: i64) -> Result<LearningGoal> {
        self.set_goal_at(description, duration_days, Local::now().naive_local())
    }

    pub fn set_goal_at(
        &mut self,
        description: &str,
        duration_days: i64,
        now: NaiveDateTime,
    ) -> Result<LearningGoal> {
        // Range validation happens before any state mutation.
        let goal = LearningGoal::new(
            description,
            duration_days,
            now.date(),
            self.catalog.lesson_plan(),
        )?;

        streak::observe(&mut self.state, now)?;
        self.state.learning_goal = Some(goal.clone());
        info!("goal set: '{}' by {}", goal.description, goal.end_date);
        badges::award(&mut self.state, &self.catalog);
        self.store.save(&self.state)?;
        Ok(goal)
    }

    /// Schedule status for the current goal, if one is set. Progress is
    /// measured against the global completed-lesson set, so lessons finished
    /// before the goal was set still count.
    pub fn goal_status(&self, now: NaiveDateTime) -> Option<ScheduleStatus> {
        self.state
            .learning_goal
            .as_ref()
            .map(|goal| goal::schedule_status(goal, &self.state.completed_lessons, now))
    }
}
