//! UI layer: screens, HUD, toasts, and keyboard input.
//!
//! Every screen follows the same pattern: spawn on OnEnter, despawn on
//! OnExit, update systems gated on the state. Screens only read resources
//! and send request events; all mutation happens in the domain plugins.

mod focus_screen;
mod hud;
mod input;
mod journal_screen;
mod main_menu;
mod pause_menu;
mod shop_screen;
mod toast;

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── TOAST STACK (always present) ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::wire_xp_toasts,
                toast::wire_level_toasts,
                toast::wire_badge_toasts,
                toast::wire_affirmation_toasts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .chain(),
        );

        // ─── MAIN MENU ───
        app.add_systems(OnEnter(AppState::MainMenu), main_menu::spawn_main_menu);
        app.add_systems(OnExit(AppState::MainMenu), main_menu::despawn_main_menu);
        app.add_systems(
            Update,
            (
                main_menu::update_main_menu_visuals,
                main_menu::main_menu_navigation,
            )
                .run_if(in_state(AppState::MainMenu)),
        );

        // ─── TRACKING HUD ───
        app.add_systems(OnEnter(AppState::Tracking), hud::spawn_hud);
        app.add_systems(OnExit(AppState::Tracking), hud::despawn_hud);
        app.add_systems(
            Update,
            (
                hud::update_day_header,
                hud::update_habit_checklist,
                hud::update_xp_bar,
                hud::update_streak_display,
                hud::update_freeze_display,
                hud::update_mood_display,
            )
                .run_if(in_state(AppState::Tracking)),
        );

        // ─── GLOBAL INPUT ───
        app.add_systems(
            Update,
            (input::global_input_handler, input::habit_toggle_input)
                .run_if(in_state(AppState::Tracking)),
        );
        // Also run global_input_handler in overlay states for Escape to close
        app.add_systems(
            Update,
            input::global_input_handler.run_if(
                in_state(AppState::Journal)
                    .or(in_state(AppState::Shop))
                    .or(in_state(AppState::Focus))
                    .or(in_state(AppState::Paused)),
            ),
        );

        // ─── JOURNAL SCREEN ───
        app.add_systems(OnEnter(AppState::Journal), journal_screen::spawn_journal_screen);
        app.add_systems(OnExit(AppState::Journal), journal_screen::despawn_journal_screen);
        app.add_systems(
            Update,
            journal_screen::update_journal_display.run_if(in_state(AppState::Journal)),
        );

        // ─── SHOP SCREEN ───
        app.add_systems(OnEnter(AppState::Shop), shop_screen::spawn_shop_screen);
        app.add_systems(OnExit(AppState::Shop), shop_screen::despawn_shop_screen);
        app.add_systems(
            Update,
            (
                shop_screen::update_shop_display,
                shop_screen::shop_purchase_input,
            )
                .run_if(in_state(AppState::Shop)),
        );

        // ─── FOCUS SCREEN ───
        app.add_systems(OnEnter(AppState::Focus), focus_screen::spawn_focus_screen);
        app.add_systems(OnExit(AppState::Focus), focus_screen::despawn_focus_screen);
        app.add_systems(
            Update,
            focus_screen::update_focus_display.run_if(in_state(AppState::Focus)),
        );

        // ─── PAUSE MENU ───
        app.add_systems(OnEnter(AppState::Paused), pause_menu::spawn_pause_menu);
        app.add_systems(OnExit(AppState::Paused), pause_menu::despawn_pause_menu);
        app.add_systems(
            Update,
            (
                pause_menu::update_pause_menu_visuals,
                // Quit saves in the same frame, so the write must still run.
                pause_menu::pause_menu_navigation.before(crate::save::handle_save_requests),
            )
                .run_if(in_state(AppState::Paused)),
        );
    }
}
