//! Achievement badges.
//!
//! Badges are one-way flags: every rule is evaluated on every call, appends
//! at most once, and nothing ever removes a badge.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::Catalog;
use crate::progress::store::LearnerState;

/// Streak length that earns `StreakStar`.
pub const STREAK_STAR_DAYS: u32 = 7;

/// The closed set of achievement badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Lesson Master")]
    LessonMaster,
    #[serde(rename = "Quiz Champ")]
    QuizChamp,
    #[serde(rename = "Streak Star")]
    StreakStar,
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::LessonMaster => write!(f, "Lesson Master"),
            Badge::QuizChamp => write!(f, "Quiz Champ"),
            Badge::StreakStar => write!(f, "Streak Star"),
        }
    }
}

/// Evaluate every badge rule against the state, appending any newly earned
/// badges. Returns just the new ones.
///
/// `QuizChamp` compares each score against that quiz's own question count,
/// so quizzes of any size can earn it.
pub fn award(state: &mut LearnerState, catalog: &Catalog) -> Vec<Badge> {
    let mut earned = Vec::new();

    let total_lessons = catalog.lessons().len();
    if total_lessons > 0 && state.completed_lessons.len() == total_lessons {
        push_once(state, Badge::LessonMaster, &mut earned);
    }

    let has_perfect_score = state.quiz_scores.iter().any(|(quiz_id, score)| {
        catalog
            .quiz(quiz_id)
            .is_some_and(|quiz| quiz.max_score() > 0 && *score == quiz.max_score())
    });
    if has_perfect_score {
        push_once(state, Badge::QuizChamp, &mut earned);
    }

    if state.streak_count >= STREAK_STAR_DAYS {
        push_once(state, Badge::StreakStar, &mut earned);
    }

    earned
}

fn push_once(state: &mut LearnerState, badge: Badge, earned: &mut Vec<Badge>) {
    if !state.badges.contains(&badge) {
        state.badges.push(badge);
        earned.push(badge);
        info!("badge earned: {}", badge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn fresh_state() -> LearnerState {
        let now = NaiveDateTime::parse_from_str("2024-03-10 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        LearnerState::fresh(now)
    }

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_fresh_state_earns_nothing() {
        let mut state = fresh_state();
        assert!(award(&mut state, &catalog()).is_empty());
        assert!(state.badges.is_empty());
    }

    #[test]
    fn test_lesson_master_needs_every_lesson() {
        let catalog = catalog();
        let mut state = fresh_state();

        for lesson in catalog.lessons().iter().take(4) {
            state.mark_lesson_completed(&lesson.id);
        }
        assert!(award(&mut state, &catalog).is_empty());

        state.mark_lesson_completed(&catalog.lessons()[4].id);
        assert_eq!(award(&mut state, &catalog), vec![Badge::LessonMaster]);
    }

    #[test]
    fn test_quiz_champ_uses_each_quizzes_own_maximum() {
        let catalog = catalog();
        let quiz = &catalog.quizzes()[0];
        let mut state = fresh_state();

        // One short of perfect: no badge
        state.record_quiz_score(&quiz.id, quiz.max_score() - 1);
        assert!(award(&mut state, &catalog).is_empty());

        // Perfect on a small quiz earns it; no literal 100 anywhere
        state.record_quiz_score(&quiz.id, quiz.max_score());
        assert_eq!(award(&mut state, &catalog), vec![Badge::QuizChamp]);
    }

    #[test]
    fn test_streak_star_threshold() {
        let catalog = catalog();
        let mut state = fresh_state();

        state.streak_count = 6;
        assert!(award(&mut state, &catalog).is_empty());

        state.streak_count = 7;
        assert_eq!(award(&mut state, &catalog), vec![Badge::StreakStar]);

        state.streak_count = 30;
        assert!(award(&mut state, &catalog).is_empty(), "no duplicate");
    }

    #[test]
    fn test_badges_are_monotonic_and_duplicate_free() {
        let catalog = catalog();
        let mut state = fresh_state();
        state.streak_count = 10;

        let mut sizes = Vec::new();
        for _ in 0..5 {
            award(&mut state, &catalog);
            sizes.push(state.badges.len());
        }
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(state.badges, vec![Badge::StreakStar]);
    }

    #[test]
    fn test_badge_serializes_as_display_name() {
        let json = serde_json::to_string(&Badge::LessonMaster).unwrap();
        assert_eq!(json, r#""Lesson Master""#);
        let back: Badge = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Badge::LessonMaster);
    }
}
