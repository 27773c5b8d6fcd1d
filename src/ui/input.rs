use bevy::prelude::*;
use crate::shared::*;

/// Handles global keys for state transitions and day-level actions.
/// - Escape: Tracking -> Paused; any overlay state -> Tracking
/// - J / B / P open journal, shop, focus; M cycles mood; F toggles the
///   freeze; arrows move the viewed day; Enter ends the day by hand
pub fn global_input_handler(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    progress: Res<ChallengeProgress>,
    mut viewed: ResMut<ViewedDay>,
    mut mood_writer: EventWriter<SetMoodEvent>,
    mut freeze_writer: EventWriter<FreezeToggleEvent>,
    mut focus_writer: EventWriter<StartFocusEvent>,
    mut cancel_focus_writer: EventWriter<CancelFocusEvent>,
    mut advance_writer: EventWriter<AdvanceDayEvent>,
) {
    let state = *current_state.get();

    // Viewed-day paging and mood cycling work on both screens that show
    // a single day.
    if matches!(state, AppState::Tracking | AppState::Journal) {
        if keyboard.just_pressed(KeyCode::ArrowLeft) && viewed.0 > 1 {
            viewed.0 -= 1;
        }
        if keyboard.just_pressed(KeyCode::ArrowRight) && viewed.0 < progress.current_day {
            viewed.0 += 1;
        }
        if keyboard.just_pressed(KeyCode::KeyM) {
            let current = progress.day_record(viewed.0).and_then(|r| r.mood);
            mood_writer.send(SetMoodEvent {
                day: viewed.0,
                mood: Mood::cycle(current),
            });
        }
    }

    match state {
        AppState::Tracking => {
            if keyboard.just_pressed(KeyCode::Escape) {
                next_state.set(AppState::Paused);
            }
            if keyboard.just_pressed(KeyCode::KeyJ) {
                next_state.set(AppState::Journal);
            }
            if keyboard.just_pressed(KeyCode::KeyB) {
                next_state.set(AppState::Shop);
            }
            if keyboard.just_pressed(KeyCode::KeyP) {
                focus_writer.send(StartFocusEvent {
                    minutes: DEFAULT_FOCUS_MINUTES,
                });
            }
            if keyboard.just_pressed(KeyCode::KeyF) {
                freeze_writer.send(FreezeToggleEvent);
            }
            if keyboard.just_pressed(KeyCode::Enter) {
                advance_writer.send(AdvanceDayEvent);
            }
        }
        AppState::Journal => {
            if keyboard.just_pressed(KeyCode::Escape) || keyboard.just_pressed(KeyCode::KeyJ) {
                next_state.set(AppState::Tracking);
            }
        }
        AppState::Shop => {
            if keyboard.just_pressed(KeyCode::Escape) || keyboard.just_pressed(KeyCode::KeyB) {
                next_state.set(AppState::Tracking);
            }
            if keyboard.just_pressed(KeyCode::KeyF) {
                freeze_writer.send(FreezeToggleEvent);
            }
        }
        AppState::Focus => {
            // The focus module flips the state back once the session is
            // actually torn down.
            if keyboard.just_pressed(KeyCode::Escape) {
                cancel_focus_writer.send(CancelFocusEvent);
            }
        }
        // Paused and MainMenu handle their own keys in their own systems.
        _ => {}
    }
}

/// Digits 1-9 toggle the matching habit row for the viewed day.
pub fn habit_toggle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    progress: Res<ChallengeProgress>,
    viewed: Res<ViewedDay>,
    mut toggle_writer: EventWriter<ToggleHabitEvent>,
) {
    let key_map: &[(KeyCode, usize)] = &[
        (KeyCode::Digit1, 0),
        (KeyCode::Digit2, 1),
        (KeyCode::Digit3, 2),
        (KeyCode::Digit4, 3),
        (KeyCode::Digit5, 4),
        (KeyCode::Digit6, 5),
        (KeyCode::Digit7, 6),
        (KeyCode::Digit8, 7),
        (KeyCode::Digit9, 8),
    ];

    for (key, index) in key_map {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        let Some(habit) = progress.habits.get(*index) else {
            return;
        };
        toggle_writer.send(ToggleHabitEvent {
            day: viewed.0,
            habit_id: habit.id.clone(),
        });
        return;
    }
}
