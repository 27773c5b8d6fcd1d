use bevy::prelude::*;
use crate::shared::*;

#[derive(Component)]
pub struct FocusRoot;

#[derive(Component)]
pub struct FocusCountdownText;

pub fn spawn_focus_screen(mut commands: Commands) {
    commands
        .spawn((
            FocusRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.05, 0.05, 0.08)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FOCUS"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.7, 1.0)),
            ));

            parent.spawn((
                FocusCountdownText,
                Text::new("25:00"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                Text::new("[Esc] give up (no xp)"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.45, 0.5)),
            ));
        });
}

pub fn despawn_focus_screen(mut commands: Commands, query: Query<Entity, With<FocusRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn update_focus_display(
    session: Res<FocusSession>,
    mut query: Query<&mut Text, With<FocusCountdownText>>,
) {
    let remaining = session.remaining_secs.max(0.0) as u32;
    for mut text in &mut query {
        **text = format!("{:02}:{:02}", remaining / 60, remaining % 60);
    }
}
