//! Pure mutation operations over the progress aggregate.
//!
//! Every operation takes the current value and returns a replacement with
//! all derived state recomputed: cached level, badge union, and the
//! `updated_at` stamp. Operations that turn out to be semantic no-ops
//! return the input unchanged (same `updated_at`), which the commit path
//! uses to skip event emission and persistence.

use chrono::NaiveDate;

use super::badges::evaluate_badges;
use super::level::level_for_xp;
use crate::shared::*;

/// Recompute every derived field and stamp the mutation time. All
/// operations funnel through here exactly once per real change.
pub fn finalize(mut next: ChallengeProgress, now: i64) -> ChallengeProgress {
    next.level = level_for_xp(next.xp);
    next.badges = evaluate_badges(&next, now);
    next.updated_at = now;
    next
}

fn record_for_day<'a>(progress: &ChallengeProgress, next: &'a mut ChallengeProgress, day: u32) -> &'a mut DayRecord {
    let date = progress.date_for_day(day).to_string();
    next.history
        .entry(day)
        .or_insert_with(|| DayRecord::new(date))
}

// ═══════════════════════════════════════════════════════════════════════
// HABIT TOGGLING
// ═══════════════════════════════════════════════════════════════════════

/// Flip one habit's done-mark on one day. Marking earns 10 xp, un-marking
/// takes 10 back but never below zero. Never fails; restricting the day
/// index to `1..=current_day` is the caller's concern.
pub fn toggle_habit(
    progress: &ChallengeProgress,
    day: u32,
    habit_id: &str,
    now: i64,
) -> ChallengeProgress {
    let mut next = progress.clone();
    let record = record_for_day(progress, &mut next, day);
    if record.completed_habits.remove(habit_id) {
        next.xp = next.xp.saturating_sub(XP_PER_HABIT);
    } else {
        record.completed_habits.insert(habit_id.to_string());
        next.xp += XP_PER_HABIT;
    }
    finalize(next, now)
}

/// Grant xp from outside the toggle path (focus sessions). Zero is a no-op.
pub fn credit_xp(progress: &ChallengeProgress, amount: u64, now: i64) -> ChallengeProgress {
    if amount == 0 {
        return progress.clone();
    }
    let mut next = progress.clone();
    next.xp += amount;
    finalize(next, now)
}

// ═══════════════════════════════════════════════════════════════════════
// JOURNAL EDITS
// ═══════════════════════════════════════════════════════════════════════

pub fn set_mood(
    progress: &ChallengeProgress,
    day: u32,
    mood: Option<Mood>,
    now: i64,
) -> ChallengeProgress {
    if progress.day_record(day).map(|record| record.mood) == Some(mood)
        || (progress.day_record(day).is_none() && mood.is_none())
    {
        return progress.clone();
    }
    let mut next = progress.clone();
    record_for_day(progress, &mut next, day).mood = mood;
    finalize(next, now)
}

pub fn set_notes(
    progress: &ChallengeProgress,
    day: u32,
    notes: &str,
    now: i64,
) -> ChallengeProgress {
    let unchanged = match progress.day_record(day) {
        Some(record) => record.notes == notes,
        None => notes.is_empty(),
    };
    if unchanged {
        return progress.clone();
    }
    let mut next = progress.clone();
    record_for_day(progress, &mut next, day).notes = notes.to_string();
    finalize(next, now)
}

pub fn attach_photo(
    progress: &ChallengeProgress,
    day: u32,
    photo: Option<String>,
    now: i64,
) -> ChallengeProgress {
    let unchanged = match progress.day_record(day) {
        Some(record) => record.photo == photo,
        None => photo.is_none(),
    };
    if unchanged {
        return progress.clone();
    }
    let mut next = progress.clone();
    record_for_day(progress, &mut next, day).photo = photo;
    finalize(next, now)
}

/// Set or clear the free-text log for one habit on one day. An empty text
/// removes the entry.
pub fn log_habit(
    progress: &ChallengeProgress,
    day: u32,
    habit_id: &str,
    text: &str,
    now: i64,
) -> ChallengeProgress {
    let current = progress
        .day_record(day)
        .and_then(|record| record.habit_logs.get(habit_id));
    if current.map(String::as_str).unwrap_or("") == text {
        return progress.clone();
    }
    let mut next = progress.clone();
    let record = record_for_day(progress, &mut next, day);
    if text.is_empty() {
        record.habit_logs.remove(habit_id);
    } else {
        record.habit_logs.insert(habit_id.to_string(), text.to_string());
    }
    finalize(next, now)
}

// ═══════════════════════════════════════════════════════════════════════
// HABIT LIST EDITS
// ═══════════════════════════════════════════════════════════════════════

/// Derive a stable id from a label: lowercase, non-alphanumerics collapsed
/// to single underscores, suffixed if the id is already taken.
fn habit_id_for_label(progress: &ChallengeProgress, label: &str) -> HabitId {
    let mut base = String::new();
    for ch in label.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            base.push(ch);
        } else if !base.ends_with('_') {
            base.push('_');
        }
    }
    let base = base.trim_matches('_').to_string();
    let base = if base.is_empty() { "habit".to_string() } else { base };

    if !progress.has_habit(&base) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if !progress.has_habit(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

pub fn add_habit(
    progress: &ChallengeProgress,
    label: &str,
    description: &str,
    icon: &str,
    now: i64,
) -> ChallengeProgress {
    let mut next = progress.clone();
    let id = habit_id_for_label(progress, label);
    next.habits.push(Habit {
        id,
        label: label.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    });
    finalize(next, now)
}

/// Patch the editable fields of a habit in place. Unknown id or an edit
/// that changes nothing returns the input unchanged.
pub fn edit_habit(
    progress: &ChallengeProgress,
    habit_id: &str,
    label: Option<&str>,
    description: Option<&str>,
    icon: Option<&str>,
    now: i64,
) -> ChallengeProgress {
    let Some(index) = progress.habits.iter().position(|habit| habit.id == habit_id) else {
        return progress.clone();
    };
    let mut next = progress.clone();
    let habit = &mut next.habits[index];
    if let Some(label) = label {
        habit.label = label.to_string();
    }
    if let Some(description) = description {
        habit.description = description.to_string();
    }
    if let Some(icon) = icon {
        habit.icon = icon.to_string();
    }
    if next.habits[index] == progress.habits[index] {
        return progress.clone();
    }
    finalize(next, now)
}

/// Remove the definition only. Marks recorded against the id stay in
/// history but stop counting toward completeness.
pub fn remove_habit(progress: &ChallengeProgress, habit_id: &str, now: i64) -> ChallengeProgress {
    if !progress.has_habit(habit_id) {
        return progress.clone();
    }
    let mut next = progress.clone();
    next.habits.retain(|habit| habit.id != habit_id);
    finalize(next, now)
}

// ═══════════════════════════════════════════════════════════════════════
// DAY ADVANCE AND RESET
// ═══════════════════════════════════════════════════════════════════════

/// Step to the next day, clamped at the challenge length. The new day's
/// record stays absent until something is written to it.
pub fn advance_day(progress: &ChallengeProgress, now: i64) -> ChallengeProgress {
    if progress.current_day >= progress.total_days {
        return progress.clone();
    }
    let mut next = progress.clone();
    next.current_day += 1;
    finalize(next, now)
}

/// Brand-new progress from a template. Everything prior is discarded.
pub fn reset_from_template(
    template: &ChallengeTemplate,
    start_date: NaiveDate,
    now: i64,
) -> ChallengeProgress {
    let next = ChallengeProgress {
        current_day: 1,
        total_days: template.total_days.max(1),
        start_date,
        habits: template.habits.clone(),
        strict_mode: template.strict_mode,
        ..Default::default()
    };
    finalize(next, now)
}
