//! Data layer: populates all registries at startup.
//!
//! This plugin runs in OnEnter(AppState::Loading), fills the template and
//! affirmation registries from the hard-coded data in submodules, then
//! transitions the app into AppState::MainMenu.
//!
//! The profile load and the remote reconcile also run during Loading; they
//! order themselves after `load_all_data` so a fresh install can fall back
//! to the default template with the registry already in place.

mod affirmations;
mod templates;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// MainMenu. The state switch applies after the whole Loading schedule has
/// run, so systems ordered after this one still execute this frame.
pub fn load_all_data(
    mut template_registry: ResMut<TemplateRegistry>,
    mut affirmation_registry: ResMut<AffirmationRegistry>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    info!("DataPlugin: populating registries…");

    templates::populate_templates(&mut template_registry);
    info!("  Challenge templates loaded: {}", template_registry.templates.len());

    affirmations::populate_affirmations(&mut affirmation_registry);
    let total_lines: usize = affirmation_registry.pools.values().map(|v| v.len()).sum();
    info!(
        "  Affirmation lines loaded: {} across {} pools",
        total_lines,
        affirmation_registry.pools.len()
    );

    info!("DataPlugin: all registries populated. Transitioning to MainMenu.");
    next_state.set(AppState::MainMenu);
}
