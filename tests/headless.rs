//! Headless integration tests for Emberline.
//!
//! These tests exercise the tracker's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic plugins (skipping all rendering/UI), and verify that the
//! core loops work correctly: toggling habits, advancing days, the shop,
//! the focus timer, autosave debouncing, and boot-time sync.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use emberline::challenge::{expected_day_for, ChallengePlugin};
use emberline::data::DataPlugin;
use emberline::focus::FocusPlugin;
use emberline::progress::streaks::{best_streak, current_streak, is_day_complete};
use emberline::progress::ProgressPlugin;
use emberline::save::{
    queue_autosave_on_mutation, tick_autosave, AutosaveDebounce, SavePlugin, SaveRequestEvent,
};
use emberline::shared::*;
use emberline::sync::{
    InMemoryRemoteStore, RemoteDocument, RemoteStore, RemoteStoreHandle, SyncCompleteEvent,
    SyncPlugin,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering, windowing, or asset loading. Plugins and systems must
/// be added per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── App State ────────────────────────────────────────────────────────
    app.init_state::<AppState>();

    // Keybind systems read this; MinimalPlugins ships no input plugin.
    app.init_resource::<ButtonInput<KeyCode>>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<ChallengeProgress>()
        .init_resource::<ChallengeStats>()
        .init_resource::<UserSettings>()
        .init_resource::<FocusSession>()
        .init_resource::<ViewedDay>()
        .init_resource::<TemplateRegistry>()
        .init_resource::<AffirmationRegistry>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<ToggleHabitEvent>()
        .add_event::<SetMoodEvent>()
        .add_event::<SetNotesEvent>()
        .add_event::<AttachPhotoEvent>()
        .add_event::<LogHabitEvent>()
        .add_event::<AddHabitEvent>()
        .add_event::<EditHabitEvent>()
        .add_event::<RemoveHabitEvent>()
        .add_event::<PurchaseRequestEvent>()
        .add_event::<FreezeToggleEvent>()
        .add_event::<AdvanceDayEvent>()
        .add_event::<ResetChallengeEvent>()
        .add_event::<StartFocusEvent>()
        .add_event::<CancelFocusEvent>()
        .add_event::<HabitToggledEvent>()
        .add_event::<XpChangeEvent>()
        .add_event::<LevelUpEvent>()
        .add_event::<BadgeUnlockedEvent>()
        .add_event::<PurchaseCompleteEvent>()
        .add_event::<DayFrozenEvent>()
        .add_event::<DayAdvancedEvent>()
        .add_event::<FocusSessionCompleteEvent>()
        .add_event::<ProgressMutatedEvent>()
        .add_event::<AffirmationEvent>()
        .add_event::<ToastEvent>();

    app
}

/// Transitions the test app to the given state and ticks once to apply it.
fn enter_state(app: &mut App, state: AppState) {
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(state);
    app.update(); // process state transition
}

/// Installs a three-habit challenge directly into the progress resource.
fn seed_three_habits(app: &mut App) {
    let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
    progress.habits = vec![
        Habit::new("hydrate", "Hydrate", "Two liters of water", "droplet"),
        Habit::new("move", "Move", "Thirty minutes of movement", "shoe"),
        Habit::new("read", "Read", "Twenty pages", "book"),
    ];
}

/// Sends a ToggleHabitEvent into the app's world.
fn toggle(app: &mut App, day: u32, habit_id: &str) {
    app.world_mut().send_event(ToggleHabitEvent {
        day,
        habit_id: habit_id.to_string(),
    });
}

/// Drains an event type, returning everything currently buffered.
fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Boot reaches the menu and Tracking ticks cleanly
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_reaches_main_menu_with_catalogs() {
    let mut app = build_test_app();
    app.add_plugins((DataPlugin, ProgressPlugin));

    // First update enters Loading and populates registries; second applies NextState.
    app.update();
    app.update();

    let state = app.world().resource::<State<AppState>>();
    assert_eq!(
        state.get(),
        &AppState::MainMenu,
        "Expected to reach MainMenu after loading data"
    );

    let template_count = app.world().resource::<TemplateRegistry>().templates.len();
    let pool_count = app.world().resource::<AffirmationRegistry>().pools.len();
    assert!(
        template_count > 0,
        "Template registry should be populated during boot"
    );
    assert!(
        pool_count > 0,
        "Affirmation registry should be populated during boot"
    );

    enter_state(&mut app, AppState::Tracking);

    // Smoke: run a small frame budget in Tracking without panic.
    for _ in 0..60 {
        app.update();
    }

    let state = app.world().resource::<State<AppState>>();
    assert_eq!(
        state.get(),
        &AppState::Tracking,
        "State should remain Tracking after smoke ticks"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Marking a full first week earns xp, a level, and badges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_marking_every_habit_for_a_week_earns_streak_xp_and_badges() {
    let mut app = build_test_app();
    app.add_plugins(ProgressPlugin);
    seed_three_habits(&mut app);
    enter_state(&mut app, AppState::Tracking);

    for day in 1..=7u32 {
        for habit_id in ["hydrate", "move", "read"] {
            toggle(&mut app, day, habit_id);
        }
        app.update();
        if day < 7 {
            app.world_mut().send_event(AdvanceDayEvent);
            app.update();
        }
    }
    app.update(); // let the stats listeners drain the last frame's events

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.current_day, 7);
    assert_eq!(progress.xp, 210, "21 marks at 10 xp each");
    assert_eq!(progress.level, 2, "210 xp lands in level 2");
    assert_eq!(current_streak(progress), 7);
    assert_eq!(best_streak(progress), 7);
    assert!(progress.has_badge(BadgeId::FirstStep));
    assert!(progress.has_badge(BadgeId::WeekWarrior));
    assert_eq!(
        progress.badges.len(),
        2,
        "No other badge is reachable in the first week"
    );

    let viewed = app.world().resource::<ViewedDay>();
    assert_eq!(viewed.0, 7, "Advancing moves the journal view with it");

    let stats = app.world().resource::<ChallengeStats>();
    assert_eq!(stats.habits_completed, 21);
    assert_eq!(stats.days_advanced, 6);
    assert_eq!(stats.xp_earned, 210);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Unmarking refunds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unmarking_a_habit_refunds_its_xp() {
    let mut app = build_test_app();
    app.add_plugins(ProgressPlugin);
    seed_three_habits(&mut app);
    enter_state(&mut app, AppState::Tracking);

    for habit_id in ["hydrate", "move", "read"] {
        toggle(&mut app, 1, habit_id);
    }
    app.update();
    assert_eq!(app.world().resource::<ChallengeProgress>().xp, 30);

    // Second toggle on the same habit unchecks it.
    toggle(&mut app, 1, "read");
    app.update();
    app.update(); // settle the stats listeners

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.xp, 20, "The uncheck takes its 10 xp back");
    assert_eq!(progress.level, 1);
    assert_eq!(
        current_streak(progress),
        0,
        "An incomplete day 1 means no streak"
    );

    let stats = app.world().resource::<ChallengeStats>();
    assert_eq!(stats.habits_completed, 3);
    assert_eq!(stats.habits_unchecked, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: A missed day zeroes the current streak, not the best
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missed_day_zeroes_the_current_streak_but_keeps_the_best() {
    let mut app = build_test_app();
    app.add_plugins(ProgressPlugin);
    {
        let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
        progress.habits = vec![Habit::new("read", "Read", "Twenty pages", "book")];
    }
    enter_state(&mut app, AppState::Tracking);

    for day in 1..=9u32 {
        toggle(&mut app, day, "read");
        app.update();
        app.world_mut().send_event(AdvanceDayEvent);
        app.update();
    }

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.current_day, 10, "Nine advances from day 1");
    assert_eq!(
        current_streak(progress),
        0,
        "An untouched day 10 hides the run behind it"
    );
    assert_eq!(best_streak(progress), 9, "The nine-day run is remembered");
    assert_eq!(progress.xp, 90);
    assert!(progress.has_badge(BadgeId::WeekWarrior));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Freeze purchases need funds, then cover the day
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_freeze_purchase_needs_funds_and_covers_the_current_day() {
    let mut app = build_test_app();
    app.add_plugins(ProgressPlugin);
    seed_three_habits(&mut app);
    enter_state(&mut app, AppState::Shop);

    // Broke: the purchase must be rejected without touching anything.
    app.world_mut().send_event(PurchaseRequestEvent {
        item: ShopItemId::StreakFreeze,
    });
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.streak_freezes, 0, "No funds, no freeze");
    assert_eq!(progress.xp, 0);
    assert!(
        drain_events::<PurchaseCompleteEvent>(&mut app).is_empty(),
        "A rejected purchase completes nothing"
    );

    // Funded: the same request succeeds and debits the full cost.
    app.world_mut().resource_mut::<ChallengeProgress>().xp = STREAK_FREEZE_COST;
    app.world_mut().send_event(PurchaseRequestEvent {
        item: ShopItemId::StreakFreeze,
    });
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.streak_freezes, 1);
    assert_eq!(progress.xp, 0, "The freeze costs exactly the balance given");

    let completed = drain_events::<PurchaseCompleteEvent>(&mut app);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].item, ShopItemId::StreakFreeze);
    assert_eq!(completed[0].cost, STREAK_FREEZE_COST);

    // Spend the freeze on today from inside the shop.
    app.world_mut().send_event(FreezeToggleEvent);
    app.update();
    app.update(); // settle the stats listeners

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.streak_freezes, 0, "The freeze is consumed");
    let record = progress.day_record(1).expect("today has a record after freezing");
    assert!(record.frozen);
    assert!(
        is_day_complete(progress, 1),
        "A frozen day counts as complete with zero marks"
    );
    assert_eq!(current_streak(progress), 1);
    assert_eq!(app.world().resource::<ChallengeStats>().freezes_used, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: A focus session runs down, pays out, and returns to Tracking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_finished_focus_session_pays_out_and_returns_to_tracking() {
    let mut app = build_test_app();
    app.add_plugins((ProgressPlugin, FocusPlugin));
    enter_state(&mut app, AppState::Tracking);

    app.world_mut().send_event(StartFocusEvent { minutes: 25 });
    app.update(); // handler arms the session and requests the state change
    app.update(); // transition applies

    let state = app.world().resource::<State<AppState>>();
    assert_eq!(state.get(), &AppState::Focus, "Starting a session enters Focus");
    let session = app.world().resource::<FocusSession>();
    assert!(session.active);
    assert_eq!(session.planned_minutes, 25);

    // Fast-forward the countdown to its end.
    app.world_mut().resource_mut::<FocusSession>().remaining_secs = 0.0;
    app.update();

    let session = app.world().resource::<FocusSession>();
    assert!(!session.active, "The session tears down when the timer hits zero");
    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.xp, 50, "25 minutes at 2 xp per minute");

    app.update(); // transition back applies
    let state = app.world().resource::<State<AppState>>();
    assert_eq!(state.get(), &AppState::Tracking);

    app.update(); // settle the stats listeners
    let stats = app.world().resource::<ChallengeStats>();
    assert_eq!(stats.focus_sessions, 1);
    assert_eq!(stats.focus_minutes, 25);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: A multi-level xp jump announces the final level once
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_focus_payout_can_jump_levels_with_one_announcement() {
    let mut app = build_test_app();
    app.add_plugins((ProgressPlugin, FocusPlugin));

    // A marathon session worth 1200 xp, from level 1 straight to level 4.
    app.world_mut()
        .send_event(FocusSessionCompleteEvent { minutes: 600 });
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.xp, 1200);
    assert_eq!(progress.level, 4);

    let level_ups = drain_events::<LevelUpEvent>(&mut app);
    assert_eq!(
        level_ups.len(),
        1,
        "Intermediate levels must not each announce themselves"
    );
    assert_eq!(level_ups[0].level, 4, "The announcement names the final level");

    let xp_changes = drain_events::<XpChangeEvent>(&mut app);
    assert_eq!(xp_changes.len(), 1);
    assert_eq!(xp_changes[0].delta, 1200);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: Autosave debounce collapses a burst into one write request
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_autosave_debounce_coalesces_a_burst_into_one_write_request() {
    let mut app = build_test_app();
    app.init_resource::<AutosaveDebounce>();
    app.add_event::<SaveRequestEvent>();
    app.add_systems(Update, (queue_autosave_on_mutation, tick_autosave).chain());
    // Deterministic clock: each update advances time by 600 ms. Virtual
    // time clamps deltas to 250 ms by default, which would swallow the
    // manual step, so lift the cap.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        600,
    )));
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(Duration::MAX);

    app.update(); // first tick has zero delta

    // A burst of three commits inside one debounce window.
    for _ in 0..3 {
        app.world_mut().send_event(ProgressMutatedEvent);
    }
    app.update(); // 0.6 s: pending, timer not yet due
    assert!(
        app.world().resource::<Events<SaveRequestEvent>>().is_empty(),
        "The debounce must hold the write until the timer fires"
    );

    app.update(); // 1.2 s: timer fires, pending flushes
    assert_eq!(
        app.world().resource::<Events<SaveRequestEvent>>().len(),
        1,
        "Three mutations collapse into a single save request"
    );

    // Quiet interval: the timer keeps firing but nothing is pending.
    app.update();
    app.update();
    assert!(
        app.world().resource::<Events<SaveRequestEvent>>().is_empty(),
        "No further requests without further mutations"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 9: Boot sync adopts a newer remote profile
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_newer_remote_profile_is_adopted_at_boot() {
    let mut app = build_test_app();

    let store = InMemoryRemoteStore::default();
    let remote = RemoteDocument {
        updated_at: 999_000,
        progress: ChallengeProgress {
            xp: 777,
            current_day: 12,
            updated_at: 999_000,
            ..Default::default()
        },
        stats: ChallengeStats {
            habits_completed: 5,
            ..Default::default()
        },
    };
    store
        .upsert("local", &remote)
        .expect("in-memory upsert cannot fail");
    app.insert_resource(RemoteStoreHandle {
        store: Box::new(store),
    });

    app.add_plugins((DataPlugin, SavePlugin, SyncPlugin));
    app.update(); // boot: load data, load profile, reconcile
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.xp, 777, "The newer remote profile replaces the local one");
    assert_eq!(progress.current_day, 12);
    assert_eq!(app.world().resource::<ChallengeStats>().habits_completed, 5);
    assert_eq!(
        app.world().resource::<ViewedDay>().0,
        12,
        "The journal view follows the adopted profile"
    );

    let syncs = drain_events::<SyncCompleteEvent>(&mut app);
    assert_eq!(syncs.len(), 1);
    assert!(syncs[0].adopted_remote);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 10: Boot sync overwrites a stale remote with the local push
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stale_remote_profile_is_overwritten_by_the_local_push() {
    let mut app = build_test_app();

    let store = InMemoryRemoteStore::default();
    let remote = RemoteDocument {
        updated_at: 5,
        progress: ChallengeProgress {
            xp: 7,
            updated_at: 5,
            ..Default::default()
        },
        stats: ChallengeStats::default(),
    };
    store
        .upsert("local", &remote)
        .expect("in-memory upsert cannot fail");
    app.insert_resource(RemoteStoreHandle {
        store: Box::new(store),
    });

    // The local profile carries a later edit.
    {
        let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
        progress.xp = 42;
        progress.updated_at = 1_000_000;
    }

    app.add_plugins((DataPlugin, SavePlugin, SyncPlugin));
    app.update();
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.xp, 42, "The stale remote must not clobber local edits");

    let handle = app.world().resource::<RemoteStoreHandle>();
    let pushed = handle
        .store
        .fetch("local")
        .expect("in-memory fetch cannot fail")
        .expect("boot pushes the local profile up");
    assert_eq!(pushed.updated_at, 1_000_000, "The remote now holds the local copy");
    assert_eq!(pushed.progress.xp, 42);

    let syncs = drain_events::<SyncCompleteEvent>(&mut app);
    assert_eq!(syncs.len(), 1);
    assert!(!syncs[0].adopted_remote);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 11: Wall-clock lag advances the stored day in one burst
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_wall_clock_lag_advances_the_day_in_a_burst() {
    let mut app = build_test_app();
    app.add_plugins((ProgressPlugin, ChallengePlugin));
    // Virtual time clamps deltas to 250 ms by default, which would swallow
    // the manual 600 ms step, so lift the cap.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        600,
    )));
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(Duration::MAX);

    // The challenge started three days ago; the stored day is still 1.
    let today = chrono::Local::now().date_naive();
    {
        let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
        progress.start_date = today
            .checked_sub_days(chrono::Days::new(3))
            .expect("three days before today exists");
    }

    enter_state(&mut app, AppState::Tracking);
    for _ in 0..4 {
        app.update(); // cadence fires at 1.2 s; the burst lands right after
    }

    let progress = app.world().resource::<ChallengeProgress>();
    let expected = expected_day_for(
        progress.start_date,
        chrono::Local::now().date_naive(),
        progress.total_days,
    );
    assert!(expected >= 4, "Three days of lag puts the clock at day 4");
    assert_eq!(
        progress.current_day, expected,
        "The stored day catches up to the wall clock"
    );
    assert_eq!(app.world().resource::<ViewedDay>().0, expected);

    // Caught up: further ticks change nothing.
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<ChallengeProgress>().current_day,
        expected
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 12: Advancing clamps at the challenge length
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_day_advance_clamps_at_the_challenge_length() {
    let mut app = build_test_app();
    app.add_plugins(ProgressPlugin);
    {
        let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
        progress.total_days = 3;
    }
    enter_state(&mut app, AppState::Tracking);

    for _ in 0..5 {
        app.world_mut().send_event(AdvanceDayEvent);
    }
    app.update();
    app.update(); // settle the stats listeners

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(
        progress.current_day, 3,
        "Five advances from day 1 stop at the final day"
    );
    assert_eq!(app.world().resource::<ViewedDay>().0, 3);
    assert_eq!(
        app.world().resource::<ChallengeStats>().days_advanced,
        2,
        "Only the two real steps count; the clamped ones are no-ops"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 13: Resetting from the menu applies the chosen template
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reset_applies_the_chosen_template() {
    let mut app = build_test_app();
    app.add_plugins((DataPlugin, ProgressPlugin));
    app.update();
    app.update(); // reach MainMenu with registries populated

    // Leftover progress from an abandoned run.
    {
        let mut progress = app.world_mut().resource_mut::<ChallengeProgress>();
        progress.xp = 999;
        progress.current_day = 9;
    }

    app.world_mut().send_event(ResetChallengeEvent {
        template_id: "iron_discipline".to_string(),
    });
    app.update();

    let progress = app.world().resource::<ChallengeProgress>();
    assert_eq!(progress.habits.len(), 5, "Iron Discipline ships five habits");
    assert!(progress.strict_mode);
    assert_eq!(progress.total_days, 50);
    assert_eq!(progress.current_day, 1);
    assert_eq!(progress.xp, 0, "A reset starts from scratch");
    assert!(progress.history.is_empty());
    assert!(progress.badges.is_empty());
    assert_eq!(app.world().resource::<ViewedDay>().0, 1);

    // An unknown template id changes nothing.
    app.world_mut().send_event(ResetChallengeEvent {
        template_id: "no_such_template".to_string(),
    });
    app.update();
    assert_eq!(
        app.world().resource::<ChallengeProgress>().habits.len(),
        5,
        "A bad template id must leave the challenge untouched"
    );
}
