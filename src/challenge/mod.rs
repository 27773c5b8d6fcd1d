//! Challenge calendar: the heartbeat of the tracker.
//!
//! Responsible for:
//! - Deriving today's expected challenge day from `start_date` and the
//!   wall clock
//! - Sending `AdvanceDayEvent` until the stored day catches up (clamped
//!   to the challenge length)
//!
//! The aggregate itself never reads the clock; it only steps forward when
//! asked. That keeps every day-rollover observable as an event and lets
//! tests drive the calendar by hand.

use bevy::prelude::*;
use chrono::NaiveDate;

use crate::shared::*;

/// How often the wall clock is compared against the stored day.
#[derive(Resource)]
pub struct WallClockCadence {
    pub timer: Timer,
}

impl Default for WallClockCadence {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

pub struct ChallengePlugin;

impl Plugin for ChallengePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WallClockCadence>()
            // The day only moves while the tracker is actually open.
            .add_systems(
                Update,
                sync_wall_clock_day.run_if(in_state(AppState::Tracking)),
            );
    }
}

// ─── Day derivation ──────────────────────────────────────────────────────────

/// Which challenge day `today` falls on. Day 1 is `start_date` itself;
/// dates before the start pin to day 1 and dates past the end pin to the
/// final day.
pub fn expected_day_for(start_date: NaiveDate, today: NaiveDate, total_days: u32) -> u32 {
    let offset = today.signed_duration_since(start_date).num_days();
    if offset < 0 {
        return 1;
    }
    let day = offset as u32 + 1;
    day.min(total_days.max(1))
}

/// Compares the wall clock against the stored day at a fixed cadence and
/// queues one advance per missing day. The advances land in the same
/// frame; the aggregate applies them in order, so each skipped day still
/// gets its own record and rollover events.
fn sync_wall_clock_day(
    time: Res<Time>,
    mut cadence: ResMut<WallClockCadence>,
    progress: Res<ChallengeProgress>,
    mut advance_writer: EventWriter<AdvanceDayEvent>,
) {
    cadence.timer.tick(time.delta());
    if !cadence.timer.just_finished() {
        return;
    }

    let today = chrono::Local::now().date_naive();
    let expected = expected_day_for(progress.start_date, today, progress.total_days);
    let lag = expected.saturating_sub(progress.current_day);
    if lag == 0 {
        return;
    }

    info!(
        "[Challenge] Wall clock is at day {} but stored day is {}; advancing {} day(s).",
        expected, progress.current_day, lag
    );
    for _ in 0..lag {
        advance_writer.send(AdvanceDayEvent);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
