//! Completion-rate derivations and passive lifetime counters.
//!
//! The pure functions answer display questions over the aggregate. The
//! systems read shared events and bump `ChallengeStats` fields; nothing in
//! here feeds back into engine decisions.

use bevy::prelude::*;

use super::streaks::{is_day_complete, recorded_completion_count};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// DERIVATIONS
// ═══════════════════════════════════════════════════════════════════════

pub fn complete_day_count(progress: &ChallengeProgress) -> u32 {
    (1..=progress.current_day)
        .filter(|&day| is_day_complete(progress, day))
        .count() as u32
}

/// Fraction of days so far that are complete, in `0.0..=1.0`.
pub fn completion_rate(progress: &ChallengeProgress) -> f32 {
    if progress.current_day == 0 {
        return 0.0;
    }
    complete_day_count(progress) as f32 / progress.current_day as f32
}

/// Days where every habit was actually marked. Frozen-but-unmarked days
/// count as complete, not as perfect.
pub fn perfect_day_count(progress: &ChallengeProgress) -> u32 {
    if progress.habits.is_empty() {
        return 0;
    }
    progress
        .history
        .iter()
        .filter(|(day, record)| {
            **day <= progress.current_day
                && recorded_completion_count(record, &progress.habits) == progress.habits.len()
        })
        .count() as u32
}

/// Per-habit mark totals over the recorded history, in habit-list order.
pub fn habit_completion_counts(progress: &ChallengeProgress) -> Vec<(HabitId, u32)> {
    progress
        .habits
        .iter()
        .map(|habit| {
            let count = progress
                .history
                .values()
                .filter(|record| record.completed_habits.contains(&habit.id))
                .count() as u32;
            (habit.id.clone(), count)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// System: habits_completed / habits_unchecked
// ─────────────────────────────────────────────────────────────────────────────

/// Increments the mark counters for every committed `HabitToggledEvent`.
pub fn track_habit_toggles(
    mut events: EventReader<HabitToggledEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        if ev.now_marked {
            stats.habits_completed = stats.habits_completed.saturating_add(1);
        } else {
            stats.habits_unchecked = stats.habits_unchecked.saturating_add(1);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: journal_entries
// ─────────────────────────────────────────────────────────────────────────────

/// Uses the journal request events as a proxy for journaling activity.
/// Each mood, notes, photo, or log request increments `journal_entries`.
pub fn track_journal_entries(
    mut moods: EventReader<SetMoodEvent>,
    mut notes: EventReader<SetNotesEvent>,
    mut photos: EventReader<AttachPhotoEvent>,
    mut logs: EventReader<LogHabitEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    let count = moods.read().count()
        + notes.read().count()
        + photos.read().count()
        + logs.read().count();
    stats.journal_entries = stats.journal_entries.saturating_add(count as u64);
}

// ─────────────────────────────────────────────────────────────────────────────
// System: focus_sessions + focus_minutes
// ─────────────────────────────────────────────────────────────────────────────

/// Counts every completed focus session and its minutes.
pub fn track_focus_sessions(
    mut events: EventReader<FocusSessionCompleteEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        stats.focus_sessions = stats.focus_sessions.saturating_add(1);
        stats.focus_minutes = stats.focus_minutes.saturating_add(ev.minutes as u64);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: freezes_used
// ─────────────────────────────────────────────────────────────────────────────

/// Increments `freezes_used` whenever a day actually becomes frozen.
pub fn track_freezes_used(
    mut events: EventReader<DayFrozenEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        if ev.frozen {
            stats.freezes_used = stats.freezes_used.saturating_add(1);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: repairs_bought
// ─────────────────────────────────────────────────────────────────────────────

/// Increments `repairs_bought` for every completed streak-repair purchase.
pub fn track_repairs_bought(
    mut events: EventReader<PurchaseCompleteEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        if ev.item == ShopItemId::StreakRepair {
            stats.repairs_bought = stats.repairs_bought.saturating_add(1);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: days_advanced
// ─────────────────────────────────────────────────────────────────────────────

/// On `DayAdvancedEvent`, increments `days_advanced` and logs the running
/// totals.
pub fn track_days_advanced(
    mut events: EventReader<DayAdvancedEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        stats.days_advanced = stats.days_advanced.saturating_add(1);
        info!(
            "[Stats] Day advanced to {}. total advances: {}",
            ev.day, stats.days_advanced
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: xp_earned
// ─────────────────────────────────────────────────────────────────────────────

/// Increments `xp_earned` for every positive `XpChangeEvent`.
pub fn track_xp_earned(
    mut events: EventReader<XpChangeEvent>,
    mut stats: ResMut<ChallengeStats>,
) {
    for ev in events.read() {
        if ev.delta > 0 {
            stats.xp_earned = stats.xp_earned.saturating_add(ev.delta as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_with_days() -> ChallengeProgress {
        let mut progress = ChallengeProgress {
            current_day: 4,
            habits: vec![
                Habit::new("run", "Run", "5k", "shoe"),
                Habit::new("read", "Read", "Twenty pages", "book"),
            ],
            ..Default::default()
        };
        // Day 1 perfect, day 2 frozen only, day 3 partial, day 4 untouched.
        let mut one = DayRecord::new("d1".to_string());
        one.completed_habits.insert("run".to_string());
        one.completed_habits.insert("read".to_string());
        progress.history.insert(1, one);

        let mut two = DayRecord::new("d2".to_string());
        two.frozen = true;
        two.freeze_reason = Some(FreezeReason::Manual);
        progress.history.insert(2, two);

        let mut three = DayRecord::new("d3".to_string());
        three.completed_habits.insert("run".to_string());
        progress.history.insert(3, three);

        progress
    }

    #[test]
    fn completion_rate_counts_frozen_days_as_complete() {
        let progress = progress_with_days();
        assert_eq!(complete_day_count(&progress), 2, "day 1 by marks, day 2 by freeze");
        assert!((completion_rate(&progress) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn perfect_days_exclude_freeze_only_completions() {
        let progress = progress_with_days();
        assert_eq!(perfect_day_count(&progress), 1);
    }

    #[test]
    fn habit_counts_follow_list_order() {
        let progress = progress_with_days();
        assert_eq!(
            habit_completion_counts(&progress),
            vec![("run".to_string(), 2), ("read".to_string(), 1)]
        );
    }
}
