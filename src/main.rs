mod shared;
mod challenge;
mod progress;
mod focus;
mod coach;
mod ui;
mod save;
mod sync;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Emberline".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // App state
        .init_state::<AppState>()
        // Shared resources
        .init_resource::<ChallengeProgress>()
        .init_resource::<ChallengeStats>()
        .init_resource::<UserSettings>()
        .init_resource::<FocusSession>()
        .init_resource::<ViewedDay>()
        .init_resource::<TemplateRegistry>()
        .init_resource::<AffirmationRegistry>()
        // Request events
        .add_event::<ToggleHabitEvent>()
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
        // Notification events
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
        .add_event::<ToastEvent>()
        // Domain plugins
        .add_plugins(challenge::ChallengePlugin)
        .add_plugins(progress::ProgressPlugin)
        .add_plugins(focus::FocusPlugin)
        .add_plugins(coach::CoachPlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(sync::SyncPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
