//! Daily streak evaluation.
//!
//! A streak counts consecutive calendar days with at least one interaction.
//! Same-day calls are no-ops, so the evaluator can run on every action.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::ProgressError;
use crate::progress::store::{LearnerState, TIMESTAMP_FORMAT};

/// Date-only fallback format for documents written by older versions.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a streak observation did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Today was already counted; nothing changed.
    AlreadyCounted,
    /// Exactly one day elapsed; carries the new count.
    Extended(u32),
    /// More than one day elapsed (or the clock moved backwards); count is 1 again.
    Reset,
}

/// Parse `last_interaction_time`, accepting the full timestamp format and
/// falling back to date-only (interpreted as midnight).
pub fn parse_interaction_time(value: &str) -> Result<NaiveDateTime, ProgressError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| ProgressError::Timestamp {
            value: value.to_string(),
        })
}

/// Observe an interaction at `now` and update the streak accordingly.
///
/// On any change, `last_interaction_time` is rewritten in the full format.
pub fn observe(state: &mut LearnerState, now: NaiveDateTime) -> Result<StreakChange, ProgressError> {
    let last = parse_interaction_time(&state.last_interaction_time)?;
    let today = now.date();

    if last.date() == today {
        return Ok(StreakChange::AlreadyCounted);
    }

    let change = if (today - last.date()).num_days() == 1 {
        state.streak_count += 1;
        debug!("streak extended to {} days", state.streak_count);
        StreakChange::Extended(state.streak_count)
    } else {
        state.streak_count = 1;
        debug!("streak reset (last interaction {})", last.date());
        StreakChange::Reset
    };

    state.last_interaction_time = now.format(TIMESTAMP_FORMAT).to_string();
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(last: &str) -> LearnerState {
        let mut state = LearnerState::fresh(at("2024-03-10 12:00:00"));
        state.last_interaction_time = last.to_string();
        state.streak_count = 3;
        state
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_same_day_is_a_noop() {
        let mut state = state_at("2024-03-10 08:00:00");
        let change = observe(&mut state, at("2024-03-10 21:00:00")).unwrap();
        assert_eq!(change, StreakChange::AlreadyCounted);
        assert_eq!(state.streak_count, 3);
        assert_eq!(state.last_interaction_time, "2024-03-10 08:00:00");
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut state = state_at("2024-03-09 08:00:00");
        let now = at("2024-03-10 09:00:00");

        assert_eq!(observe(&mut state, now).unwrap(), StreakChange::Extended(4));
        let snapshot = state.clone();
        assert_eq!(observe(&mut state, now).unwrap(), StreakChange::AlreadyCounted);
        assert_eq!(state.streak_count, snapshot.streak_count);
        assert_eq!(state.last_interaction_time, snapshot.last_interaction_time);
    }

    #[test]
    fn test_next_day_extends() {
        let mut state = state_at("2024-03-09 23:59:00");
        let change = observe(&mut state, at("2024-03-10 00:01:00")).unwrap();
        assert_eq!(change, StreakChange::Extended(4));
        assert_eq!(state.streak_count, 4);
        assert_eq!(state.last_interaction_time, "2024-03-10 00:01:00");
    }

    #[test]
    fn test_gap_resets() {
        let mut state = state_at("2024-03-01 10:00:00");
        let change = observe(&mut state, at("2024-03-10 10:00:00")).unwrap();
        assert_eq!(change, StreakChange::Reset);
        assert_eq!(state.streak_count, 1);
    }

    #[test]
    fn test_clock_moved_backwards_resets() {
        let mut state = state_at("2024-03-10 10:00:00");
        let change = observe(&mut state, at("2024-03-08 10:00:00")).unwrap();
        assert_eq!(change, StreakChange::Reset);
        assert_eq!(state.streak_count, 1);
    }

    #[test]
    fn test_date_only_timestamp_is_accepted() {
        let mut state = state_at("2024-03-09");
        let change = observe(&mut state, at("2024-03-10 07:00:00")).unwrap();
        assert_eq!(change, StreakChange::Extended(4));
        // Rewritten in the full format
        assert_eq!(state.last_interaction_time, "2024-03-10 07:00:00");
    }

    #[test]
    fn test_unparseable_timestamp_is_an_error() {
        let mut state = state_at("last tuesday");
        let err = observe(&mut state, at("2024-03-10 07:00:00")).unwrap_err();
        assert!(matches!(err, ProgressError::Timestamp { .. }));
        // State untouched on error
        assert_eq!(state.streak_count, 3);
    }
}
