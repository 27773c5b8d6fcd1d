use bevy::prelude::*;

use crate::save::SaveRequestEvent;
use crate::shared::*;

#[derive(Component)]
pub struct PauseMenuRoot;

#[derive(Component)]
pub struct PauseMenuItemText {
    pub index: usize,
}

#[derive(Resource)]
pub struct PauseMenuState {
    pub cursor: usize,
}

const PAUSE_MENU_OPTIONS: &[&str] = &["Resume", "Save Now", "Main Menu", "Quit"];

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_pause_menu(mut commands: Commands) {
    commands.insert_resource(PauseMenuState { cursor: 0 });

    commands
        .spawn((
            PauseMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(24.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("PAUSED"),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent
                .spawn((Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(8.0),
                    ..default()
                },))
                .with_children(|menu| {
                    for (i, label) in PAUSE_MENU_OPTIONS.iter().enumerate() {
                        menu.spawn((
                            PauseMenuItemText { index: i },
                            Text::new(*label),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    }
                });
        });
}

pub fn despawn_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<PauseMenuState>();
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE / INTERACTION
// ═══════════════════════════════════════════════════════════════════════

pub fn update_pause_menu_visuals(
    state: Option<Res<PauseMenuState>>,
    mut query: Query<(&PauseMenuItemText, &mut Text, &mut TextColor)>,
) {
    let Some(state) = state else { return };
    for (item, mut text, mut color) in &mut query {
        let selected = item.index == state.cursor;
        let label = PAUSE_MENU_OPTIONS[item.index];
        **text = if selected {
            format!("> {label} <")
        } else {
            label.to_string()
        };
        color.0 = if selected {
            Color::srgb(1.0, 0.85, 0.4)
        } else {
            Color::WHITE
        };
    }
}

pub fn pause_menu_navigation(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: Option<ResMut<PauseMenuState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut app_exit: EventWriter<AppExit>,
) {
    let Some(ref mut state) = state else { return };

    if keyboard.just_pressed(KeyCode::ArrowDown) && state.cursor < PAUSE_MENU_OPTIONS.len() - 1 {
        state.cursor += 1;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) && state.cursor > 0 {
        state.cursor -= 1;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(AppState::Tracking);
        return;
    }

    if !keyboard.just_pressed(KeyCode::Enter) {
        return;
    }

    match state.cursor {
        0 => next_state.set(AppState::Tracking),
        1 => {
            save_writer.send(SaveRequestEvent);
        }
        2 => next_state.set(AppState::MainMenu),
        3 => {
            // Flush once more on the way out.
            save_writer.send(SaveRequestEvent);
            app_exit.send(AppExit::Success);
        }
        _ => {}
    }
}
