use bevy::prelude::*;
use crate::shared::*;

#[derive(Component)]
pub struct JournalRoot;

#[derive(Component)]
pub struct JournalHeaderText;

#[derive(Component)]
pub struct JournalBodyText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_journal_screen(mut commands: Commands) {
    commands
        .spawn((
            JournalRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                row_gap: Val::Px(12.0),
                padding: UiRect::all(Val::Px(32.0)),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.12, 0.10)),
        ))
        .with_children(|parent| {
            parent.spawn((
                JournalHeaderText,
                Text::new(""),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 1.0, 0.8)),
            ));

            parent.spawn((
                JournalBodyText,
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                Text::new("[</>] day  [M] mood  [Esc] back"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.45, 0.5)),
            ));
        });
}

pub fn despawn_journal_screen(mut commands: Commands, query: Query<Entity, With<JournalRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn update_journal_display(
    progress: Res<ChallengeProgress>,
    viewed: Res<ViewedDay>,
    mut header_query: Query<&mut Text, (With<JournalHeaderText>, Without<JournalBodyText>)>,
    mut body_query: Query<&mut Text, With<JournalBodyText>>,
) {
    for mut text in &mut header_query {
        **text = format!("Journal, day {} ({})", viewed.0, progress.date_for_day(viewed.0));
    }

    let record = progress.day_record(viewed.0);
    for mut text in &mut body_query {
        let mut body = String::new();

        let mood = record
            .and_then(|r| r.mood)
            .map(|m| m.label())
            .unwrap_or("not set");
        body.push_str(&format!("Mood: {mood}\n"));

        match record.map(|r| r.notes.as_str()).filter(|n| !n.is_empty()) {
            Some(notes) => body.push_str(&format!("Notes: {notes}\n")),
            None => body.push_str("Notes: (empty)\n"),
        }

        if let Some(record) = record {
            if let Some(photo) = &record.photo {
                body.push_str(&format!("Photo: {photo}\n"));
            }
            if record.frozen {
                let reason = record.freeze_reason.map(|r| r.label()).unwrap_or("frozen");
                body.push_str(&format!("Frozen: {reason}\n"));
            }
            if !record.habit_logs.is_empty() {
                body.push_str("\nHabit logs:\n");
                for (habit_id, log) in &record.habit_logs {
                    let label = progress
                        .habits
                        .iter()
                        .find(|h| h.id == *habit_id)
                        .map(|h| h.label.as_str())
                        .unwrap_or(habit_id.as_str());
                    body.push_str(&format!("  {label}: {log}\n"));
                }
            }
        }

        **text = body;
    }
}
