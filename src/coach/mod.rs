//! The coach: short encouragement lines at meaningful moments.
//!
//! Responsible for:
//! - Reacting to day rollovers, badge unlocks, streak milestones, and
//!   comebacks with one affirmation each
//! - Delegating line production to a pluggable text generator, falling
//!   back to the static pools when none is configured or generation fails
//!
//! The tracking engines never depend on this module; it only consumes
//! their notification events.

use bevy::prelude::*;
use rand::Rng;
use std::fmt;

use crate::progress::streaks::{best_streak, current_streak};
use crate::shared::*;

/// Streak lengths worth celebrating out loud.
pub const STREAK_MILESTONES: [u32; 6] = [3, 7, 14, 21, 30, 50];

// ═══════════════════════════════════════════════════════════════════════
// THE TEXT GENERATION SEAM
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextGenError {
    Unavailable(String),
}

impl fmt::Display for TextGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextGenError::Unavailable(msg) => write!(f, "Text generator unavailable: {msg}"),
        }
    }
}

pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, TextGenError>;
}

/// Canned generator: picks one of its lines at random, prompt ignored.
pub struct StaticAffirmations {
    pub lines: Vec<String>,
}

impl StaticAffirmations {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextGenerator for StaticAffirmations {
    fn generate(&self, _prompt: &str) -> Result<String, TextGenError> {
        if self.lines.is_empty() {
            return Err(TextGenError::Unavailable("no lines configured".to_string()));
        }
        let mut rng = rand::thread_rng();
        Ok(self.lines[rng.gen_range(0..self.lines.len())].clone())
    }
}

/// The live generator, if any. None means the pools answer directly.
#[derive(Resource, Default)]
pub struct CoachHandle {
    pub generator: Option<Box<dyn TextGenerator>>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct CoachPlugin;

impl Plugin for CoachPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CoachHandle>()
            // Listeners stay ungated; the events they react to only fire
            // from gated systems.
            .add_systems(
                Update,
                (affirm_on_day_advance, affirm_on_badge_unlock, affirm_on_streaks),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LINE RESOLUTION
// ═══════════════════════════════════════════════════════════════════════

/// What a real generator would be asked. Kept short and factual so a
/// remote model has the numbers it needs.
pub fn affirmation_prompt(context: AffirmationContext, progress: &ChallengeProgress) -> String {
    let moment = match context {
        AffirmationContext::DayStart => "a new challenge day is starting".to_string(),
        AffirmationContext::BadgeUnlocked => "a badge was just unlocked".to_string(),
        AffirmationContext::StreakMilestone => {
            format!("a streak milestone of {} days was just reached", current_streak(progress))
        }
        AffirmationContext::Comeback => "the streak restarted after a gap".to_string(),
    };
    format!(
        "You are a supportive habit coach. Day {} of {}, current streak {} days, level {}; {}. \
         Reply with one short encouraging sentence.",
        progress.current_day,
        progress.total_days,
        current_streak(progress),
        progress.level,
        moment
    )
}

fn pool_line(registry: &AffirmationRegistry, context: AffirmationContext) -> Option<String> {
    let pool = registry.pools.get(&context)?;
    if pool.is_empty() {
        return None;
    }
    let mut rng = rand::thread_rng();
    Some(pool[rng.gen_range(0..pool.len())].clone())
}

/// Generator first, pools second. Returns None only when both are empty.
pub fn resolve_affirmation(
    handle: &CoachHandle,
    registry: &AffirmationRegistry,
    context: AffirmationContext,
    prompt: &str,
) -> Option<String> {
    if let Some(generator) = &handle.generator {
        match generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => return Some(text),
            Ok(_) => warn!("[Coach] Generator returned an empty line; using the pools."),
            Err(e) => warn!("[Coach] {e}; using the pools."),
        }
    }
    pool_line(registry, context)
}

// ═══════════════════════════════════════════════════════════════════════
// LISTENERS
// ═══════════════════════════════════════════════════════════════════════

fn affirm_on_day_advance(
    mut advanced: EventReader<DayAdvancedEvent>,
    handle: Res<CoachHandle>,
    registry: Res<AffirmationRegistry>,
    progress: Res<ChallengeProgress>,
    mut affirmations: EventWriter<AffirmationEvent>,
) {
    if advanced.read().count() == 0 {
        return;
    }
    let prompt = affirmation_prompt(AffirmationContext::DayStart, &progress);
    if let Some(text) = resolve_affirmation(&handle, &registry, AffirmationContext::DayStart, &prompt)
    {
        affirmations.send(AffirmationEvent { text });
    }
}

fn affirm_on_badge_unlock(
    mut unlocks: EventReader<BadgeUnlockedEvent>,
    handle: Res<CoachHandle>,
    registry: Res<AffirmationRegistry>,
    progress: Res<ChallengeProgress>,
    mut affirmations: EventWriter<AffirmationEvent>,
) {
    for ev in unlocks.read() {
        let prompt = affirmation_prompt(AffirmationContext::BadgeUnlocked, &progress);
        if let Some(text) =
            resolve_affirmation(&handle, &registry, AffirmationContext::BadgeUnlocked, &prompt)
        {
            info!("[Coach] Cheering badge {:?}", ev.id);
            affirmations.send(AffirmationEvent { text });
        }
    }
}

/// Watches completed days for streak milestones and comebacks. A milestone
/// is only celebrated once per run length, so re-toggling the same day
/// stays quiet.
fn affirm_on_streaks(
    mut toggles: EventReader<HabitToggledEvent>,
    mut last_celebrated: Local<u32>,
    handle: Res<CoachHandle>,
    registry: Res<AffirmationRegistry>,
    progress: Res<ChallengeProgress>,
    mut affirmations: EventWriter<AffirmationEvent>,
) {
    let completed_today = toggles
        .read()
        .any(|ev| ev.day_complete && ev.day == progress.current_day);
    if !completed_today {
        return;
    }

    let streak = current_streak(&progress);
    let context = if STREAK_MILESTONES.contains(&streak) && streak > *last_celebrated {
        *last_celebrated = streak;
        AffirmationContext::StreakMilestone
    } else if streak == 1 && best_streak(&progress) > 1 {
        AffirmationContext::Comeback
    } else {
        return;
    };

    let prompt = affirmation_prompt(context, &progress);
    if let Some(text) = resolve_affirmation(&handle, &registry, context, &prompt) {
        affirmations.send(AffirmationEvent { text });
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
