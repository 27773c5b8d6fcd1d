//! Badge catalog and evaluation.
//!
//! The entire badge life cycle is one pure pass: `evaluate_badges` takes
//! progress and returns the award list as it should be, which is always a
//! superset of what is already held. The aggregate diffs old against new
//! and fires `BadgeUnlockedEvent`s; nothing in here touches events.

use super::streaks::is_day_complete;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// BADGE DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════

/// Static description of a single badge.
pub struct BadgeDef {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The closed badge catalog, in unlock-announcement order.
pub const BADGES: &[BadgeDef] = &[
    BadgeDef {
        id: BadgeId::FirstStep,
        name: "First Step",
        description: "Complete day 1 of the challenge",
        icon: "footprint",
    },
    BadgeDef {
        id: BadgeId::WeekWarrior,
        name: "Week Warrior",
        description: "Complete the first seven days",
        icon: "shield",
    },
    BadgeDef {
        id: BadgeId::HalfwayHero,
        name: "Halfway Hero",
        description: "Pass the midpoint of the challenge",
        icon: "flag",
    },
    BadgeDef {
        id: BadgeId::StrictMaster,
        name: "Strict Master",
        description: "Complete 10 days in strict mode",
        icon: "crown",
    },
    BadgeDef {
        id: BadgeId::ProjectElite,
        name: "Project Elite",
        description: "Complete every day of the challenge",
        icon: "trophy",
    },
];

/// Catalog lookup. The enum is closed, so this never misses.
pub fn badge_def(id: BadgeId) -> &'static BadgeDef {
    BADGES
        .iter()
        .find(|def| def.id == id)
        .unwrap_or(&BADGES[0])
}

// ═══════════════════════════════════════════════════════════════════════
// HELPER: evaluate each badge condition
// ═══════════════════════════════════════════════════════════════════════

/// Returns `true` if the badge's condition currently holds. Assumes the
/// badge is not yet held.
fn evaluate_condition(id: BadgeId, progress: &ChallengeProgress) -> bool {
    match id {
        BadgeId::FirstStep => is_day_complete(progress, 1),

        BadgeId::WeekWarrior => {
            (1..=WEEK_WARRIOR_SPAN).all(|day| is_day_complete(progress, day))
        }

        BadgeId::HalfwayHero => progress.current_day > progress.total_days / 2,

        BadgeId::StrictMaster => {
            if !progress.strict_mode {
                return false;
            }
            let complete_days = (1..=progress.current_day)
                .filter(|&day| is_day_complete(progress, day))
                .count() as u32;
            complete_days >= STRICT_MASTER_DAYS
        }

        BadgeId::ProjectElite => {
            (1..=progress.total_days).all(|day| is_day_complete(progress, day))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVALUATION
// ═══════════════════════════════════════════════════════════════════════

/// The award list as it should be after this evaluation: everything already
/// held, plus every newly qualifying badge stamped `now`. Deterministic and
/// idempotent; re-running on the same progress adds nothing. Held badges
/// are never removed, even if their condition no longer holds.
pub fn evaluate_badges(progress: &ChallengeProgress, now: i64) -> Vec<BadgeAward> {
    let mut awards = progress.badges.clone();
    for def in BADGES {
        if awards.iter().any(|award| award.id == def.id) {
            continue;
        }
        if evaluate_condition(def.id, progress) {
            awards.push(BadgeAward {
                id: def.id,
                unlocked_at: now,
            });
        }
    }
    awards
}

/// Ids present in `after` but not `before`, in catalog order.
pub fn newly_unlocked(before: &[BadgeAward], after: &[BadgeAward]) -> Vec<BadgeId> {
    BADGES
        .iter()
        .map(|def| def.id)
        .filter(|id| {
            after.iter().any(|award| award.id == *id)
                && !before.iter().any(|award| award.id == *id)
        })
        .collect()
}
