use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct MainMenuRoot;

#[derive(Component)]
pub struct MainMenuItemText {
    pub index: usize,
}

#[derive(Component)]
pub struct MainMenuTemplateBlurb;

/// Tracks main menu selection and which template the New Challenge row
/// currently points at.
#[derive(Resource)]
pub struct MainMenuState {
    pub cursor: usize,
    pub template_index: usize,
}

const MAIN_MENU_OPTIONS: &[&str] = &["Continue", "New Challenge", "Quit"];

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_main_menu(mut commands: Commands) {
    commands.insert_resource(MainMenuState {
        cursor: 0,
        template_index: 0,
    });

    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(30.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.10, 0.16)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("EMBERLINE"),
                TextFont {
                    font_size: 52.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.7, 0.3)),
            ));

            parent.spawn((
                Text::new("A 50-Day Habit Challenge"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.75, 0.8)),
            ));

            parent
                .spawn((Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(8.0),
                    ..default()
                },))
                .with_children(|menu| {
                    for (i, label) in MAIN_MENU_OPTIONS.iter().enumerate() {
                        menu.spawn((
                            MainMenuItemText { index: i },
                            Text::new(*label),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    }
                });

            // Template name and description for the New Challenge row.
            parent.spawn((
                MainMenuTemplateBlurb,
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.65, 0.7)),
            ));

            parent.spawn((
                Text::new("Arrows to move, Left/Right to pick a template, Enter to confirm"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.45, 0.5)),
            ));
        });
}

pub fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<MainMenuState>();
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE / INTERACTION
// ═══════════════════════════════════════════════════════════════════════

pub fn update_main_menu_visuals(
    state: Option<Res<MainMenuState>>,
    templates: Res<TemplateRegistry>,
    mut item_query: Query<(&MainMenuItemText, &mut Text, &mut TextColor), Without<MainMenuTemplateBlurb>>,
    mut blurb_query: Query<&mut Text, With<MainMenuTemplateBlurb>>,
) {
    let Some(state) = state else { return };

    for (item, mut text, mut color) in &mut item_query {
        let selected = item.index == state.cursor;
        let label = match (item.index, templates.templates.get(state.template_index)) {
            (1, Some(template)) => format!("New Challenge: {}", template.name),
            _ => MAIN_MENU_OPTIONS[item.index].to_string(),
        };
        **text = if selected {
            format!("> {label} <")
        } else {
            label
        };
        color.0 = if selected {
            Color::srgb(1.0, 0.85, 0.4)
        } else {
            Color::WHITE
        };
    }

    for mut blurb in &mut blurb_query {
        **blurb = match templates.templates.get(state.template_index) {
            Some(template) if state.cursor == 1 => format!(
                "{} days{}. {}",
                template.total_days,
                if template.strict_mode { ", strict" } else { "" },
                template.description
            ),
            _ => String::new(),
        };
    }
}

pub fn main_menu_navigation(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: Option<ResMut<MainMenuState>>,
    templates: Res<TemplateRegistry>,
    progress: Res<ChallengeProgress>,
    mut next_state: ResMut<NextState<AppState>>,
    mut reset_writer: EventWriter<ResetChallengeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
    mut app_exit: EventWriter<AppExit>,
) {
    let Some(ref mut state) = state else { return };

    if keyboard.just_pressed(KeyCode::ArrowDown) && state.cursor < MAIN_MENU_OPTIONS.len() - 1 {
        state.cursor += 1;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) && state.cursor > 0 {
        state.cursor -= 1;
    }

    // Left/Right cycle the template on the New Challenge row.
    if state.cursor == 1 && !templates.templates.is_empty() {
        let count = templates.templates.len();
        if keyboard.just_pressed(KeyCode::ArrowRight) {
            state.template_index = (state.template_index + 1) % count;
        }
        if keyboard.just_pressed(KeyCode::ArrowLeft) {
            state.template_index = (state.template_index + count - 1) % count;
        }
    }

    if !keyboard.just_pressed(KeyCode::Enter) {
        return;
    }

    match state.cursor {
        0 => {
            // Continue only makes sense once a challenge exists.
            if progress.habits.is_empty() {
                toast_writer.send(ToastEvent {
                    message: "No challenge yet. Start a new one!".to_string(),
                    duration_secs: 2.5,
                });
            } else {
                next_state.set(AppState::Tracking);
            }
        }
        1 => {
            if let Some(template) = templates.templates.get(state.template_index) {
                reset_writer.send(ResetChallengeEvent {
                    template_id: template.id.clone(),
                });
                next_state.set(AppState::Tracking);
            }
        }
        2 => {
            app_exit.send(AppExit::Success);
        }
        _ => {}
    }
}
