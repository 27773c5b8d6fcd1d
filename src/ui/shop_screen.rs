use bevy::prelude::*;

use crate::progress::shop::{find_repairable_day, SHOP_ITEMS};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct ShopRoot;

#[derive(Component)]
pub struct ShopBalanceText;

#[derive(Component)]
pub struct ShopItemText {
    pub index: usize,
}

#[derive(Component)]
pub struct ShopHintText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_shop_screen(mut commands: Commands) {
    commands
        .spawn((
            ShopRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.10, 0.08, 0.14)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("REWARD SHOP"),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.6, 1.0)),
            ));

            parent.spawn((
                ShopBalanceText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.84, 0.0)),
            ));

            for (index, item) in SHOP_ITEMS.iter().enumerate() {
                parent.spawn((
                    ShopItemText { index },
                    Text::new(format!(
                        "[{}] {} ({} xp): {}",
                        index + 1,
                        item.name,
                        item.cost,
                        item.description
                    )),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            }

            parent.spawn((
                ShopHintText,
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.65, 0.7)),
            ));

            parent.spawn((
                Text::new("[1-2] buy  [F] toggle freeze on today  [Esc] back"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.45, 0.5)),
            ));
        });
}

pub fn despawn_shop_screen(mut commands: Commands, query: Query<Entity, With<ShopRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE / INTERACTION
// ═══════════════════════════════════════════════════════════════════════

pub fn update_shop_display(
    progress: Res<ChallengeProgress>,
    mut balance_query: Query<&mut Text, (With<ShopBalanceText>, Without<ShopHintText>)>,
    mut item_query: Query<(&ShopItemText, &mut TextColor)>,
    mut hint_query: Query<&mut Text, (With<ShopHintText>, Without<ShopBalanceText>)>,
) {
    for mut text in &mut balance_query {
        **text = format!(
            "Balance: {} xp    Freezes held: {}",
            progress.xp, progress.streak_freezes
        );
    }

    // Grey out what the balance cannot cover.
    for (item, mut color) in &mut item_query {
        let Some(def) = SHOP_ITEMS.get(item.index) else {
            continue;
        };
        color.0 = if progress.xp >= def.cost {
            Color::WHITE
        } else {
            Color::srgb(0.45, 0.45, 0.5)
        };
    }

    for mut text in &mut hint_query {
        **text = match find_repairable_day(&progress) {
            Some(day) => format!("Time Warp would mend day {day}"),
            None => "No missed day to mend".to_string(),
        };
    }
}

pub fn shop_purchase_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut purchase_writer: EventWriter<PurchaseRequestEvent>,
) {
    if keyboard.just_pressed(KeyCode::Digit1) {
        purchase_writer.send(PurchaseRequestEvent {
            item: ShopItemId::StreakFreeze,
        });
    }
    if keyboard.just_pressed(KeyCode::Digit2) {
        purchase_writer.send(PurchaseRequestEvent {
            item: ShopItemId::StreakRepair,
        });
    }
}
