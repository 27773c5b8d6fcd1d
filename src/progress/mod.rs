//! Progress domain: the aggregate writer, engines, shop, and counters.
//!
//! All cross-domain communication goes through `crate::shared::*` events
//! and resources. Request events computed here go through the pure ops,
//! then through `commit_mutation`, which is the only place the resource is
//! replaced and the only source of diff events.

use bevy::prelude::*;

use crate::shared::*;

pub mod badges;
pub mod level;
pub mod ops;
pub mod shop;
pub mod stats;
pub mod streaks;

use shop::{handle_freeze_toggles, handle_purchase_requests};
use stats::{
    track_days_advanced, track_focus_sessions, track_freezes_used, track_habit_toggles,
    track_journal_entries, track_repairs_bought, track_xp_earned,
};

// ─────────────────────────────────────────────────────────────────────────────
// Commit path
// ─────────────────────────────────────────────────────────────────────────────

/// Replace the progress resource with a recomputed candidate and emit the
/// diff events. Returns `false` without touching anything when the
/// candidate is identical to the current value (a semantic no-op).
/// Level-up fires once naming the final level; badge events follow catalog
/// order. Level drops (xp spent in the shop) emit nothing.
pub(crate) fn commit_mutation(
    progress: &mut ResMut<ChallengeProgress>,
    next: ChallengeProgress,
    xp_events: &mut EventWriter<XpChangeEvent>,
    level_ups: &mut EventWriter<LevelUpEvent>,
    badge_events: &mut EventWriter<BadgeUnlockedEvent>,
    mutated: &mut EventWriter<ProgressMutatedEvent>,
) -> bool {
    if next == **progress {
        return false;
    }

    let xp_delta = next.xp as i64 - progress.xp as i64;
    if xp_delta != 0 {
        xp_events.send(XpChangeEvent { delta: xp_delta });
    }
    if next.level > progress.level {
        level_ups.send(LevelUpEvent { level: next.level });
        info!("[Progress] Level up! Now level {}", next.level);
    }
    for id in badges::newly_unlocked(&progress.badges, &next.badges) {
        let def = badges::badge_def(id);
        badge_events.send(BadgeUnlockedEvent {
            id,
            name: def.name.to_string(),
            description: def.description.to_string(),
        });
        info!("[Progress] Badge unlocked: {} - {}", def.name, def.description);
    }

    **progress = next;
    mutated.send(ProgressMutatedEvent);
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// System: habit toggle requests
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_toggle_requests(
    mut requests: EventReader<ToggleHabitEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut toggled: EventWriter<HabitToggledEvent>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
) {
    for request in requests.read() {
        let next = ops::toggle_habit(&progress, request.day, &request.habit_id, now_millis());
        let now_marked = next
            .day_record(request.day)
            .is_some_and(|record| record.completed_habits.contains(&request.habit_id));
        let day_complete = streaks::is_day_complete(&next, request.day);

        if commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        ) {
            toggled.send(HabitToggledEvent {
                day: request.day,
                habit_id: request.habit_id.clone(),
                now_marked,
                day_complete,
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: journal edit requests
// ─────────────────────────────────────────────────────────────────────────────

/// Applies mood, notes, photo, and per-habit log edits. Journal edits never
/// touch xp, but they go through the same commit path so `updated_at` and
/// persistence behave like any other mutation.
pub fn handle_journal_requests(
    mut moods: EventReader<SetMoodEvent>,
    mut notes: EventReader<SetNotesEvent>,
    mut photos: EventReader<AttachPhotoEvent>,
    mut logs: EventReader<LogHabitEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
) {
    // Each edit is applied to the state left behind by the previous one,
    // so several edits in one frame all land.
    for ev in moods.read() {
        let next = ops::set_mood(&progress, ev.day, ev.mood, now_millis());
        commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        );
    }
    for ev in notes.read() {
        let next = ops::set_notes(&progress, ev.day, &ev.notes, now_millis());
        commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        );
    }
    for ev in photos.read() {
        let next = ops::attach_photo(&progress, ev.day, ev.photo.clone(), now_millis());
        commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        );
    }
    for ev in logs.read() {
        let next = ops::log_habit(&progress, ev.day, &ev.habit_id, &ev.text, now_millis());
        commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: habit list edit requests
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_habit_edits(
    mut adds: EventReader<AddHabitEvent>,
    mut edits: EventReader<EditHabitEvent>,
    mut removals: EventReader<RemoveHabitEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in adds.read() {
        let next = ops::add_habit(&progress, &ev.label, &ev.description, &ev.icon, now_millis());
        if commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        ) {
            toasts.send(ToastEvent {
                message: format!("Habit added: {}", ev.label),
                duration_secs: 2.0,
            });
        }
    }
    for ev in edits.read() {
        let next = ops::edit_habit(
            &progress,
            &ev.habit_id,
            ev.label.as_deref(),
            ev.description.as_deref(),
            ev.icon.as_deref(),
            now_millis(),
        );
        commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        );
    }
    for ev in removals.read() {
        let next = ops::remove_habit(&progress, &ev.habit_id, now_millis());
        if commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        ) {
            toasts.send(ToastEvent {
                message: "Habit removed".to_string(),
                duration_secs: 2.0,
            });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: day advance requests
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_advance_requests(
    mut requests: EventReader<AdvanceDayEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut viewed: ResMut<ViewedDay>,
    mut advanced: EventWriter<DayAdvancedEvent>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
) {
    for _ in requests.read() {
        let next = ops::advance_day(&progress, now_millis());
        let day = next.current_day;
        if commit_mutation(
            &mut progress,
            next,
            &mut xp_events,
            &mut level_ups,
            &mut badge_events,
            &mut mutated,
        ) {
            viewed.0 = day;
            advanced.send(DayAdvancedEvent { day });
            info!("[Progress] Advanced to day {day}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// System: challenge reset requests
// ─────────────────────────────────────────────────────────────────────────────

/// Rebuilds progress from a template. The replacement is wholesale, so no
/// xp/level/badge diff events are emitted; listeners learn about it from
/// `ProgressMutatedEvent` and the fresh resource.
pub fn handle_reset_requests(
    mut requests: EventReader<ResetChallengeEvent>,
    templates: Res<TemplateRegistry>,
    mut progress: ResMut<ChallengeProgress>,
    mut viewed: ResMut<ViewedDay>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for request in requests.read() {
        let Some(template) = templates.get(&request.template_id) else {
            warn!("[Progress] Unknown challenge template '{}'", request.template_id);
            continue;
        };
        let today = chrono::Local::now().date_naive();
        *progress = ops::reset_from_template(template, today, now_millis());
        viewed.0 = 1;
        mutated.send(ProgressMutatedEvent);
        info!(
            "[Progress] New challenge '{}' started: {} days, {} habits",
            template.name,
            template.total_days,
            progress.habits.len()
        );
        toasts.send(ToastEvent {
            message: format!("{} begins. Day 1 of {}", template.name, template.total_days),
            duration_secs: 3.0,
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        // ── Systems: aggregate writers ─────────────────────────────────────
        // Each handler is registered once with a combined state condition so
        // a single event reader covers every state it can fire from.
        app.add_systems(
            Update,
            (
                // Toggles and journal edits arrive from the tracking screen
                // and from past-day review in the journal.
                handle_toggle_requests,
                handle_journal_requests,
            )
                .run_if(in_state(AppState::Tracking).or(in_state(AppState::Journal))),
        );
        app.add_systems(
            Update,
            (
                handle_habit_edits,
                handle_advance_requests,
            )
                .run_if(in_state(AppState::Tracking)),
        );
        // Freezes can be toggled with the hotkey or from the shop screen.
        app.add_systems(
            Update,
            handle_freeze_toggles
                .run_if(in_state(AppState::Tracking).or(in_state(AppState::Shop))),
        );
        app.add_systems(
            Update,
            handle_purchase_requests.run_if(in_state(AppState::Shop)),
        );
        // A challenge can be (re)started from the menu or restarted mid-run.
        app.add_systems(
            Update,
            handle_reset_requests
                .run_if(in_state(AppState::MainMenu).or(in_state(AppState::Tracking))),
        );

        // ── Systems: passive counters, gated on no state ───────────────────
        // Counter events originate from Tracking, Journal, and Shop alike;
        // the listeners stay ungated so none are dropped between states.
        app.add_systems(
            Update,
            (
                track_habit_toggles,
                track_journal_entries,
                track_focus_sessions,
                track_freezes_used,
                track_repairs_bought,
                track_days_advanced,
                track_xp_earned,
            ),
        );

        info!("[Progress] ProgressPlugin registered.");
    }
}
