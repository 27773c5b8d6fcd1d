use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the toast container node (top-center of screen).
#[derive(Component)]
pub struct ToastContainer;

/// Marker for individual toast nodes.
#[derive(Component)]
pub struct ToastItem {
    pub timer: Timer,
    pub fade_timer: Option<Timer>,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN CONTAINER
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_toast_container(mut commands: Commands) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(60.0),
            left: Val::Percent(50.0),
            width: Val::Px(320.0),
            // Shift left by half of the width to truly center it.
            margin: UiRect {
                left: Val::Px(-160.0),
                ..default()
            },
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
        PickingBehavior::IGNORE,
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// HANDLE TOAST EVENTS: spawn a child node per event
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_toast_events(
    mut commands: Commands,
    mut events: EventReader<ToastEvent>,
    container_query: Query<Entity, With<ToastContainer>>,
    existing_toasts: Query<Entity, With<ToastItem>>,
) {
    let Ok(container) = container_query.get_single() else {
        return;
    };

    for event in events.read() {
        // Enforce max 3 visible toasts: despawn oldest if over limit.
        let toast_entities: Vec<Entity> = existing_toasts.iter().collect();
        if toast_entities.len() >= 3 {
            if let Some(&oldest) = toast_entities.first() {
                commands.entity(oldest).despawn_recursive();
            }
        }

        let message = event.message.clone();
        let duration = event.duration_secs;

        let toast_entity = commands
            .spawn((
                ToastItem {
                    timer: Timer::from_seconds(duration, TimerMode::Once),
                    fade_timer: None,
                },
                Node {
                    padding: UiRect {
                        left: Val::Px(12.0),
                        right: Val::Px(12.0),
                        top: Val::Px(5.0),
                        bottom: Val::Px(5.0),
                    },
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                BorderColor(Color::srgba(0.5, 0.5, 0.5, 0.5)),
                PickingBehavior::IGNORE,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(message),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    PickingBehavior::IGNORE,
                ));
            })
            .id();

        commands.entity(container).add_child(toast_entity);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE TOASTS: tick timers and fade out expired entries
// ═══════════════════════════════════════════════════════════════════════

pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toast_query: Query<(Entity, &mut ToastItem, &mut BackgroundColor, &Children)>,
    mut text_color_query: Query<&mut TextColor>,
) {
    for (entity, mut toast, mut bg_color, children) in &mut toast_query {
        // If not yet in fade mode, tick main timer.
        if toast.fade_timer.is_none() {
            toast.timer.tick(time.delta());

            if toast.timer.just_finished() {
                toast.fade_timer = Some(Timer::from_seconds(0.5, TimerMode::Once));
            }
            continue;
        }

        let (finished, alpha) = {
            let Some(ft) = toast.fade_timer.as_mut() else {
                continue;
            };
            ft.tick(time.delta());
            let progress =
                (ft.elapsed_secs() / ft.duration().as_secs_f32()).clamp(0.0, 1.0);
            (ft.finished(), 1.0 - progress)
        };

        if finished {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        // Fade the background and the text children together.
        let current = bg_color.0.to_srgba();
        bg_color.0 = Color::srgba(current.red, current.green, current.blue, 0.75 * alpha);
        for &child in children.iter() {
            if let Ok(mut text_color) = text_color_query.get_mut(child) {
                text_color.0 = Color::srgba(1.0, 1.0, 1.0, alpha);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENT-TO-TOAST WIRING SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn wire_xp_toasts(
    mut xp_events: EventReader<XpChangeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for event in xp_events.read() {
        let message = if event.delta >= 0 {
            format!("+{} xp", event.delta)
        } else {
            format!("-{} xp", event.delta.unsigned_abs())
        };
        toast_writer.send(ToastEvent {
            message,
            duration_secs: 2.0,
        });
    }
}

pub fn wire_level_toasts(
    mut level_events: EventReader<LevelUpEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for event in level_events.read() {
        toast_writer.send(ToastEvent {
            message: format!("Level {}!", event.level),
            duration_secs: 4.0,
        });
    }
}

pub fn wire_badge_toasts(
    mut badge_events: EventReader<BadgeUnlockedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for event in badge_events.read() {
        toast_writer.send(ToastEvent {
            message: format!("Badge unlocked: {}", event.name),
            duration_secs: 4.0,
        });
    }
}

pub fn wire_affirmation_toasts(
    mut affirmations: EventReader<AffirmationEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for event in affirmations.read() {
        toast_writer.send(ToastEvent {
            message: event.text.clone(),
            duration_secs: 5.0,
        });
    }
}
