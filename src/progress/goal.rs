//! Learning goals: a deadline plus a lesson checklist, and the
//! on-track/behind-schedule evaluation against it.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ProgressError;

pub const MIN_GOAL_DAYS: i64 = 1;
pub const MAX_GOAL_DAYS: i64 = 30;

/// A user-defined goal. `lesson_plan` is a snapshot of the catalog's lesson
/// ids at the time the goal was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoal {
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lesson_plan: Vec<String>,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
}

impl LearningGoal {
    /// Create a goal ending `duration_days` after `start`.
    ///
    /// Durations outside [1, 30] are rejected before anything is built.
    pub fn new(
        description: impl Into<String>,
        duration_days: i64,
        start: NaiveDate,
        lesson_plan: Vec<String>,
    ) -> Result<Self, ProgressError> {
        if !(MIN_GOAL_DAYS..=MAX_GOAL_DAYS).contains(&duration_days) {
            return Err(ProgressError::GoalDuration {
                days: duration_days,
            });
        }
        Ok(Self {
            description: description.into(),
            start_date: start,
            end_date: start + Duration::days(duration_days),
            lesson_plan,
            completed_lessons: Vec::new(),
        })
    }
}

/// Where the learner stands relative to the goal deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleStatus {
    OnTrack { remaining: Vec<String>, days_left: i64 },
    Behind { remaining: Vec<String>, days_left: i64 },
}

impl ScheduleStatus {
    pub fn remaining(&self) -> &[String] {
        match self {
            ScheduleStatus::OnTrack { remaining, .. } => remaining,
            ScheduleStatus::Behind { remaining, .. } => remaining,
        }
    }

    /// Whole days until the deadline; negative once overdue.
    pub fn days_left(&self) -> i64 {
        match self {
            ScheduleStatus::OnTrack { days_left, .. } => *days_left,
            ScheduleStatus::Behind { days_left, .. } => *days_left,
        }
    }

    pub fn is_behind(&self) -> bool {
        matches!(self, ScheduleStatus::Behind { .. })
    }
}

/// Compare the remaining lesson count against the days left.
///
/// Remaining lessons keep the plan's order. Behind schedule means fewer days
/// than lessons; finishing on the last possible day still counts as on track.
pub fn schedule_status(
    goal: &LearningGoal,
    completed_lessons: &[String],
    now: NaiveDateTime,
) -> ScheduleStatus {
    let remaining: Vec<String> = goal
        .lesson_plan
        .iter()
        .filter(|lesson| !completed_lessons.contains(lesson))
        .cloned()
        .collect();
    let days_left = (goal.end_date - now.date()).num_days();

    if days_left < remaining.len() as i64 {
        ScheduleStatus::Behind {
            remaining,
            days_left,
        }
    } else {
        ScheduleStatus::OnTrack {
            remaining,
            days_left,
        }
    }
}
