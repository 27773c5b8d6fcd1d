use bevy::prelude::*;

use crate::progress::level::{xp_into_level, xp_span_of_level};
use crate::progress::streaks::{best_streak, current_streak, is_day_complete};
use crate::shared::*;

/// Checklist rows are pre-spawned; digits 1-9 address them, so nine is the cap.
pub const MAX_HABIT_ROWS: usize = 9;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudDayHeader;

#[derive(Component)]
pub struct HudHabitText {
    pub index: usize,
}

#[derive(Component)]
pub struct HudXpText;

#[derive(Component)]
pub struct HudXpBarFill;

#[derive(Component)]
pub struct HudStreakText;

#[derive(Component)]
pub struct HudFreezeText;

#[derive(Component)]
pub struct HudMoodText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            BackgroundColor(Color::srgb(0.09, 0.10, 0.13)),
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            // ─── TOP BAR: day header, mood, freezes ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(44.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|top_bar| {
                    top_bar.spawn((
                        HudDayHeader,
                        Text::new("Day 1 of 50"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        PickingBehavior::IGNORE,
                    ));

                    top_bar.spawn((
                        HudMoodText,
                        Text::new("Mood: none"),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.9, 0.5)),
                        PickingBehavior::IGNORE,
                    ));

                    top_bar.spawn((
                        HudFreezeText,
                        Text::new("Freezes: 0"),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.6, 0.85, 1.0)),
                        PickingBehavior::IGNORE,
                    ));
                });

            // ─── CHECKLIST ───
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::FlexStart,
                        row_gap: Val::Px(6.0),
                        padding: UiRect::all(Val::Px(24.0)),
                        ..default()
                    },
                    PickingBehavior::IGNORE,
                ))
                .with_children(|list| {
                    for index in 0..MAX_HABIT_ROWS {
                        list.spawn((
                            HudHabitText { index },
                            Text::new(""),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                            PickingBehavior::IGNORE,
                        ));
                    }
                });

            // ─── BOTTOM BAR: xp, streaks, key hints ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                    PickingBehavior::IGNORE,
                ))
                .with_children(|bottom| {
                    bottom
                        .spawn((
                            Node {
                                width: Val::Percent(100.0),
                                flex_direction: FlexDirection::Row,
                                justify_content: JustifyContent::SpaceBetween,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            PickingBehavior::IGNORE,
                        ))
                        .with_children(|row| {
                            row.spawn((
                                HudXpText,
                                Text::new("Lv 1, 0 xp"),
                                TextFont {
                                    font_size: 16.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(1.0, 0.84, 0.0)),
                                PickingBehavior::IGNORE,
                            ));

                            row.spawn((
                                HudStreakText,
                                Text::new("Streak 0 (best 0)"),
                                TextFont {
                                    font_size: 16.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(1.0, 0.55, 0.3)),
                                PickingBehavior::IGNORE,
                            ));
                        });

                    // XP progress toward the next level.
                    bottom
                        .spawn((
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(10.0),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                            BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.9)),
                            BorderColor(Color::srgba(0.6, 0.6, 0.6, 0.8)),
                            PickingBehavior::IGNORE,
                        ))
                        .with_children(|bar| {
                            bar.spawn((
                                HudXpBarFill,
                                Node {
                                    width: Val::Percent(0.0),
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(Color::srgb(1.0, 0.84, 0.0)),
                                PickingBehavior::IGNORE,
                            ));
                        });

                    bottom.spawn((
                        Text::new(
                            "[1-9] toggle  [</>] day  [M] mood  [F] freeze  [J] journal  \
                             [B] shop  [P] focus  [Enter] end day  [Esc] pause",
                        ),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.55, 0.6, 0.65)),
                        PickingBehavior::IGNORE,
                    ));
                });
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn update_day_header(
    progress: Res<ChallengeProgress>,
    viewed: Res<ViewedDay>,
    mut query: Query<&mut Text, With<HudDayHeader>>,
) {
    for mut text in &mut query {
        let date = progress.date_for_day(viewed.0);
        let mut header = format!("Day {} of {}  ({date})", viewed.0, progress.total_days);
        if viewed.0 != progress.current_day {
            header.push_str("  [viewing]");
        }
        if let Some(record) = progress.day_record(viewed.0) {
            if record.frozen {
                let reason = record
                    .freeze_reason
                    .map(|r| r.label())
                    .unwrap_or("frozen");
                header.push_str(&format!("  [{reason}]"));
            }
        }
        **text = header;
    }
}

pub fn update_habit_checklist(
    progress: Res<ChallengeProgress>,
    viewed: Res<ViewedDay>,
    mut query: Query<(&HudHabitText, &mut Text, &mut TextColor)>,
) {
    let record = progress.day_record(viewed.0);
    for (row, mut text, mut color) in &mut query {
        let Some(habit) = progress.habits.get(row.index) else {
            **text = String::new();
            continue;
        };
        let done = record
            .map(|r| r.completed_habits.contains(&habit.id))
            .unwrap_or(false);
        let mark = if done { "[x]" } else { "[ ]" };
        **text = format!("{}. {mark} {}", row.index + 1, habit.label);
        color.0 = if done {
            Color::srgb(0.4, 0.9, 0.4)
        } else {
            Color::WHITE
        };
    }
}

pub fn update_xp_bar(
    progress: Res<ChallengeProgress>,
    mut text_query: Query<&mut Text, With<HudXpText>>,
    mut fill_query: Query<&mut Node, With<HudXpBarFill>>,
) {
    for mut text in &mut text_query {
        **text = format!("Lv {}, {} xp", progress.level, progress.xp);
    }
    for mut node in &mut fill_query {
        let span = xp_span_of_level(progress.level).max(1);
        let into = xp_into_level(progress.xp);
        node.width = Val::Percent((into as f32 / span as f32 * 100.0).clamp(0.0, 100.0));
    }
}

pub fn update_streak_display(
    progress: Res<ChallengeProgress>,
    mut query: Query<&mut Text, With<HudStreakText>>,
) {
    for mut text in &mut query {
        **text = format!(
            "Streak {} (best {})",
            current_streak(&progress),
            best_streak(&progress)
        );
    }
}

pub fn update_freeze_display(
    progress: Res<ChallengeProgress>,
    mut query: Query<(&mut Text, &mut TextColor), With<HudFreezeText>>,
) {
    let today_done = is_day_complete(&progress, progress.current_day);
    for (mut text, mut color) in &mut query {
        **text = format!("Freezes: {}", progress.streak_freezes);
        // Nudge toward the shop when today is at risk and no cover is held.
        color.0 = if !today_done && progress.streak_freezes == 0 {
            Color::srgb(0.9, 0.5, 0.4)
        } else {
            Color::srgb(0.6, 0.85, 1.0)
        };
    }
}

pub fn update_mood_display(
    progress: Res<ChallengeProgress>,
    viewed: Res<ViewedDay>,
    mut query: Query<&mut Text, With<HudMoodText>>,
) {
    let mood = progress.day_record(viewed.0).and_then(|r| r.mood);
    for mut text in &mut query {
        **text = match mood {
            Some(mood) => format!("Mood: {}", mood.label()),
            None => "Mood: none".to_string(),
        };
    }
}
