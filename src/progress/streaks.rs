//! Day-completeness predicate and streak scans.
//!
//! Everything here is a pure read over `ChallengeProgress`. Streaks are
//! always derived on demand, never stored, so freezing or repairing a day
//! changes them with no special-casing.

use crate::shared::*;

/// Completed-habit count for a record, restricted to habits that still
/// exist. Ids left behind by deleted habits stay recorded but never count.
pub fn recorded_completion_count(record: &DayRecord, habits: &[Habit]) -> usize {
    record
        .completed_habits
        .iter()
        .filter(|id| habits.iter().any(|habit| &habit.id == *id))
        .count()
}

/// A day is complete iff it is frozen, or every current habit is marked
/// done on it. A day with no record is incomplete. An empty habit list
/// never completes a day on its own.
pub fn is_day_complete(progress: &ChallengeProgress, day: u32) -> bool {
    let Some(record) = progress.day_record(day) else {
        return false;
    };
    if record.frozen {
        return true;
    }
    !progress.habits.is_empty()
        && recorded_completion_count(record, &progress.habits) == progress.habits.len()
}

/// Consecutive complete days ending at the current day. Zero whenever the
/// current day itself is incomplete; an earlier run does not count until
/// today rejoins it.
pub fn current_streak(progress: &ChallengeProgress) -> u32 {
    let mut streak = 0;
    let mut day = progress.current_day;
    while day >= 1 && is_day_complete(progress, day) {
        streak += 1;
        if day == 1 {
            break;
        }
        day -= 1;
    }
    streak
}

/// Longest run of consecutive complete days anywhere in `1..=current_day`.
/// Single forward scan, constant space.
pub fn best_streak(progress: &ChallengeProgress) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for day in 1..=progress.current_day {
        if is_day_complete(progress, day) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_habit_progress() -> ChallengeProgress {
        ChallengeProgress {
            habits: vec![
                Habit::new("meditate", "Meditate", "Ten minutes of stillness", "lotus"),
                Habit::new("exercise", "Exercise", "Move for half an hour", "dumbbell"),
            ],
            ..Default::default()
        }
    }

    fn complete_day(progress: &mut ChallengeProgress, day: u32) {
        let record = progress
            .history
            .entry(day)
            .or_insert_with(|| DayRecord::new(format!("2026-03-{day:02}")));
        for habit in &progress.habits {
            record.completed_habits.insert(habit.id.clone());
        }
    }

    fn freeze_day(progress: &mut ChallengeProgress, day: u32, reason: FreezeReason) {
        let record = progress
            .history
            .entry(day)
            .or_insert_with(|| DayRecord::new(format!("2026-03-{day:02}")));
        record.frozen = true;
        record.freeze_reason = Some(reason);
    }

    #[test]
    fn day_without_record_is_incomplete() {
        let progress = two_habit_progress();
        assert!(!is_day_complete(&progress, 1));
    }

    #[test]
    fn day_with_all_habits_marked_is_complete() {
        let mut progress = two_habit_progress();
        complete_day(&mut progress, 1);
        assert!(is_day_complete(&progress, 1));
    }

    #[test]
    fn partially_marked_day_is_incomplete() {
        let mut progress = two_habit_progress();
        let mut record = DayRecord::new("2026-03-01".to_string());
        record.completed_habits.insert("meditate".to_string());
        progress.history.insert(1, record);
        assert!(!is_day_complete(&progress, 1));
    }

    #[test]
    fn frozen_day_is_complete_regardless_of_marks() {
        let mut progress = two_habit_progress();
        freeze_day(&mut progress, 1, FreezeReason::Manual);
        assert!(is_day_complete(&progress, 1), "frozen day counts with zero marks");
    }

    #[test]
    fn deleted_habit_marks_do_not_count_toward_completeness() {
        let mut progress = two_habit_progress();
        complete_day(&mut progress, 1);
        // A mark from a habit that was later removed.
        progress
            .history
            .get_mut(&1)
            .unwrap()
            .completed_habits
            .insert("cold_shower".to_string());
        assert_eq!(
            recorded_completion_count(progress.day_record(1).unwrap(), &progress.habits),
            2,
            "vestigial id must be filtered out of the count"
        );
        assert!(is_day_complete(&progress, 1));
    }

    #[test]
    fn empty_habit_list_never_auto_completes() {
        let mut progress = two_habit_progress();
        complete_day(&mut progress, 1);
        progress.habits.clear();
        assert!(!is_day_complete(&progress, 1));
        freeze_day(&mut progress, 1, FreezeReason::Manual);
        assert!(is_day_complete(&progress, 1), "freeze still completes the day");
    }

    #[test]
    fn current_streak_is_zero_when_today_incomplete() {
        let mut progress = two_habit_progress();
        progress.current_day = 5;
        for day in 1..=4 {
            complete_day(&mut progress, day);
        }
        assert_eq!(current_streak(&progress), 0, "run before an incomplete today is ignored");
        assert_eq!(best_streak(&progress), 4);
    }

    #[test]
    fn current_streak_counts_back_from_today() {
        let mut progress = two_habit_progress();
        progress.current_day = 5;
        for day in 3..=5 {
            complete_day(&mut progress, day);
        }
        assert_eq!(current_streak(&progress), 3);
    }

    #[test]
    fn full_history_streak_reaches_day_one() {
        let mut progress = two_habit_progress();
        progress.current_day = 7;
        for day in 1..=7 {
            complete_day(&mut progress, day);
        }
        assert_eq!(current_streak(&progress), 7);
        assert_eq!(best_streak(&progress), 7);
    }

    #[test]
    fn frozen_day_bridges_a_streak() {
        let mut progress = two_habit_progress();
        progress.current_day = 3;
        complete_day(&mut progress, 1);
        freeze_day(&mut progress, 2, FreezeReason::TimeWarp);
        complete_day(&mut progress, 3);
        assert_eq!(current_streak(&progress), 3, "frozen gap day must not break the run");
    }

    #[test]
    fn best_streak_tracks_the_longest_run_not_the_latest() {
        let mut progress = two_habit_progress();
        progress.current_day = 10;
        for day in 1..=4 {
            complete_day(&mut progress, day);
        }
        for day in 7..=8 {
            complete_day(&mut progress, day);
        }
        assert_eq!(best_streak(&progress), 4);
        assert_eq!(current_streak(&progress), 0);
    }
}
