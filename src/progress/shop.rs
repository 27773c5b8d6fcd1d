//! Shop catalog, purchase engine, and freeze inventory.
//!
//! Purchases are transactional over the progress value: the engine clones,
//! debits, applies the effect, and either returns the fully recomputed
//! replacement or an error with the original untouched. Nothing here is
//! partially observable.

use bevy::prelude::*;
use std::fmt;

use super::ops::finalize;
use super::streaks::recorded_completion_count;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// SHOP CATALOG
// ═══════════════════════════════════════════════════════════════════════

/// Static description of a single shop listing. Prices are in xp.
pub struct ShopItemDef {
    pub id: ShopItemId,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
    pub icon: &'static str,
}

pub const SHOP_ITEMS: &[ShopItemDef] = &[
    ShopItemDef {
        id: ShopItemId::StreakFreeze,
        name: "Streak Freeze",
        description: "Bank one freeze to protect the current day",
        cost: STREAK_FREEZE_COST,
        icon: "snowflake",
    },
    ShopItemDef {
        id: ShopItemId::StreakRepair,
        name: "Time Warp",
        description: "Retroactively mend your most recent missed day",
        cost: STREAK_REPAIR_COST,
        icon: "hourglass",
    },
];

/// Catalog lookup. The enum is closed, so this never misses.
pub fn shop_item_def(id: ShopItemId) -> &'static ShopItemDef {
    SHOP_ITEMS
        .iter()
        .find(|def| def.id == id)
        .unwrap_or(&SHOP_ITEMS[0])
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    InsufficientFunds { cost: u64, have: u64 },
    NoRepairableDay,
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { cost, have } => {
                write!(f, "Not enough xp: need {cost}, have {have}")
            }
            PurchaseError::NoRepairableDay => {
                write!(f, "Nothing to repair: every past day is complete or frozen")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeError {
    NoFreezeAvailable,
}

impl fmt::Display for FreezeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeError::NoFreezeAvailable => {
                write!(f, "No streak freezes in inventory")
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PURCHASE ENGINE
// ═══════════════════════════════════════════════════════════════════════

/// Most recent repairable day strictly before today: the first day, walking
/// backward from `current_day - 1`, with no record, or with fewer marks
/// than current habits and no freeze. Frozen and complete days are skipped.
pub fn find_repairable_day(progress: &ChallengeProgress) -> Option<u32> {
    (1..progress.current_day).rev().find(|day| {
        match progress.day_record(*day) {
            None => true,
            Some(record) => {
                !record.frozen
                    && recorded_completion_count(record, &progress.habits) < progress.habits.len()
            }
        }
    })
}

/// Buy one shop item. Debit precedes the effect; if the effect cannot
/// apply (`streak_repair` with nothing to repair) the whole purchase fails
/// and the returned error leaves the input value untouched, debit included.
pub fn purchase(
    progress: &ChallengeProgress,
    item: ShopItemId,
    now: i64,
) -> Result<ChallengeProgress, PurchaseError> {
    let def = shop_item_def(item);
    if progress.xp < def.cost {
        return Err(PurchaseError::InsufficientFunds {
            cost: def.cost,
            have: progress.xp,
        });
    }

    let mut next = progress.clone();
    next.xp -= def.cost;

    match item {
        ShopItemId::StreakFreeze => {
            next.streak_freezes += 1;
        }
        ShopItemId::StreakRepair => {
            let Some(day) = find_repairable_day(progress) else {
                return Err(PurchaseError::NoRepairableDay);
            };
            let date = progress.date_for_day(day).to_string();
            let record = next
                .history
                .entry(day)
                .or_insert_with(|| DayRecord::new(date));
            record.frozen = true;
            record.freeze_reason = Some(FreezeReason::TimeWarp);
        }
    }

    Ok(finalize(next, now))
}

// ═══════════════════════════════════════════════════════════════════════
// FREEZE INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Freeze the current day, consuming one inventory unit. Freezing a day
/// that is already frozen is a no-op returning the value unchanged.
pub fn apply_freeze(
    progress: &ChallengeProgress,
    now: i64,
) -> Result<ChallengeProgress, FreezeError> {
    if progress
        .day_record(progress.current_day)
        .is_some_and(|record| record.frozen)
    {
        return Ok(progress.clone());
    }
    if progress.streak_freezes == 0 {
        return Err(FreezeError::NoFreezeAvailable);
    }

    let mut next = progress.clone();
    next.streak_freezes -= 1;
    let date = progress.date_for_day(progress.current_day).to_string();
    let record = next
        .history
        .entry(progress.current_day)
        .or_insert_with(|| DayRecord::new(date));
    record.frozen = true;
    record.freeze_reason = Some(FreezeReason::Manual);
    Ok(finalize(next, now))
}

/// Un-freeze the current day and refund the inventory unit. A no-op when
/// the current day is not frozen.
pub fn remove_freeze(progress: &ChallengeProgress, now: i64) -> ChallengeProgress {
    let frozen = progress
        .day_record(progress.current_day)
        .is_some_and(|record| record.frozen);
    if !frozen {
        return progress.clone();
    }

    let mut next = progress.clone();
    next.streak_freezes += 1;
    if let Some(record) = next.history.get_mut(&progress.current_day) {
        record.frozen = false;
        record.freeze_reason = None;
    }
    finalize(next, now)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM: purchase requests
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_purchase_requests(
    mut requests: EventReader<PurchaseRequestEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut purchases: EventWriter<PurchaseCompleteEvent>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for request in requests.read() {
        let def = shop_item_def(request.item);
        match purchase(&progress, request.item, now_millis()) {
            Ok(next) => {
                super::commit_mutation(
                    &mut progress,
                    next,
                    &mut xp_events,
                    &mut level_ups,
                    &mut badge_events,
                    &mut mutated,
                );
                purchases.send(PurchaseCompleteEvent {
                    item: request.item,
                    cost: def.cost,
                });
                info!("[Shop] Purchased {} for {} xp", def.name, def.cost);
                toasts.send(ToastEvent {
                    message: format!("{} acquired", def.name),
                    duration_secs: 2.5,
                });
            }
            Err(err) => {
                warn!("[Shop] Purchase of {} rejected: {err}", def.name);
                toasts.send(ToastEvent {
                    message: err.to_string(),
                    duration_secs: 2.5,
                });
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM: freeze toggle
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_freeze_toggles(
    mut requests: EventReader<FreezeToggleEvent>,
    mut progress: ResMut<ChallengeProgress>,
    mut frozen_events: EventWriter<DayFrozenEvent>,
    mut xp_events: EventWriter<XpChangeEvent>,
    mut level_ups: EventWriter<LevelUpEvent>,
    mut badge_events: EventWriter<BadgeUnlockedEvent>,
    mut mutated: EventWriter<ProgressMutatedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for _ in requests.read() {
        let day = progress.current_day;
        let currently_frozen = progress
            .day_record(day)
            .is_some_and(|record| record.frozen);

        if currently_frozen {
            let next = remove_freeze(&progress, now_millis());
            if super::commit_mutation(
                &mut progress,
                next,
                &mut xp_events,
                &mut level_ups,
                &mut badge_events,
                &mut mutated,
            ) {
                frozen_events.send(DayFrozenEvent {
                    day,
                    frozen: false,
                    reason: None,
                });
                toasts.send(ToastEvent {
                    message: "Freeze returned to inventory".to_string(),
                    duration_secs: 2.0,
                });
            }
        } else {
            match apply_freeze(&progress, now_millis()) {
                Ok(next) => {
                    if super::commit_mutation(
                        &mut progress,
                        next,
                        &mut xp_events,
                        &mut level_ups,
                        &mut badge_events,
                        &mut mutated,
                    ) {
                        frozen_events.send(DayFrozenEvent {
                            day,
                            frozen: true,
                            reason: Some(FreezeReason::Manual),
                        });
                        toasts.send(ToastEvent {
                            message: "Day frozen".to_string(),
                            duration_secs: 2.0,
                        });
                    }
                }
                Err(err) => {
                    warn!("[Shop] Freeze rejected: {err}");
                    toasts.send(ToastEvent {
                        message: err.to_string(),
                        duration_secs: 2.5,
                    });
                }
            }
        }
    }
}
