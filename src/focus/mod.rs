//! Focus timer.
//!
//! A single countdown session (default 25 minutes). Only a session that
//! runs all the way to zero pays out xp, at 2 xp per planned minute;
//! cancelling forfeits the whole session. The payout goes through the
//! aggregate like every other xp source, so levels and badges react to it.

use bevy::prelude::*;

use crate::progress::{commit_mutation, ops};
use crate::shared::*;

pub struct FocusPlugin;

impl Plugin for FocusPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_start_focus
                .run_if(in_state(AppState::Tracking).or(in_state(AppState::Focus))),
        )
        .add_systems(
            Update,
            (tick_focus_session, handle_cancel_focus).run_if(in_state(AppState::Focus)),
        )
        // The payout listener stays ungated so the xp lands even if the
        // state flips in the same frame the timer hits zero.
        .add_systems(Update, credit_focus_xp.after(tick_focus_session));
    }
}

// ─── Session lifecycle ───────────────────────────────────────────────────────

fn handle_start_focus(
    mut requests: EventReader<StartFocusEvent>,
    mut session: ResMut<FocusSession>,
    mut next_state: ResMut<NextState<AppState>>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for ev in requests.read() {
        if session.active {
            toasts.send(ToastEvent {
                message: "A focus session is already running".to_string(),
                duration_secs: 2.0,
            });
            continue;
        }
        let minutes = ev.minutes.max(1);
        session.active = true;
        session.planned_minutes = minutes;
        session.remaining_secs = minutes as f32 * 60.0;
        next_state.set(AppState::Focus);
        info!("[Focus] Session started: {minutes} min");
        toasts.send(ToastEvent {
            message: format!("Focus session started: {minutes} min"),
            duration_secs: 2.0,
        });
    }
}

fn tick_focus_session(
    time: Res<Time>,
    mut session: ResMut<FocusSession>,
    mut complete_events: EventWriter<FocusSessionCompleteEvent>,
    mut next_state: ResMut<NextState<AppState>>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !session.active {
        return;
    }
    session.remaining_secs -= time.delta_secs();
    if session.remaining_secs > 0.0 {
        return;
    }

    session.active = false;
    session.remaining_secs = 0.0;
    let minutes = session.planned_minutes;
    info!("[Focus] Session complete: {minutes} min");
    complete_events.send(FocusSessionCompleteEvent { minutes });
    toasts.send(ToastEvent {
        message: format!("Focus complete! +{} xp", minutes as u64 * FOCUS_XP_PER_MINUTE),
        duration_secs: 3.0,
    });
    next_state.set(AppState::Tracking);
}

fn handle_cancel_focus(
    mut requests: EventReader<CancelFocusEvent>,
    mut session: ResMut<FocusSession>,
    mut next_state: ResMut<NextState<AppState>>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if requests.read().count() == 0 || !session.active {
        return;
    }
    session.active = false;
    session.remaining_secs = 0.0;
    info!("[Focus] Session cancelled; no xp awarded.");
    toasts.send(ToastEvent {
        message: "Focus session cancelled".to_string(),
        duration_secs: 2.0,
    });
    next_state.set(AppState::Tracking);
}

// ─── Payout ──────────────────────────────────────────────────────────────────

fn credit_focus_xp(
    mut completions: EventReader<FocusSessionCompleteEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
) {
    for ev in completions.read() {
        let amount = ev.minutes as u64 * FOCUS_XP_PER_MINUTE;
        let next = ops::credit_xp(&progress, amount, now_millis());
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
