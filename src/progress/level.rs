//! Level curve and xp arithmetic.
//!
//! The curve is quadratic: level N spans `[100·(N−1)², 100·N²)` xp, so each
//! level costs 100 more than the one before it. Levels are always derived
//! from xp; the cached field on progress exists only for display and event
//! diffing.

use crate::shared::*;

/// Level for an xp total. Level 1 starts at 0 xp.
pub fn level_for_xp(xp: u64) -> u32 {
    (xp / XP_PER_LEVEL_STEP).isqrt() as u32 + 1
}

/// Lowest xp total that is inside the given level. Inverse of
/// `level_for_xp` at span boundaries.
pub fn xp_threshold_for_level(level: u32) -> u64 {
    let offset = level.saturating_sub(1) as u64;
    XP_PER_LEVEL_STEP * offset * offset
}

/// xp accumulated inside the current level, for the progress bar.
pub fn xp_into_level(xp: u64) -> u64 {
    xp - xp_threshold_for_level(level_for_xp(xp))
}

/// Width of the current level's span, for the progress bar denominator.
pub fn xp_span_of_level(level: u32) -> u64 {
    xp_threshold_for_level(level + 1) - xp_threshold_for_level(level)
}

/// End-of-day completion bonus: base 50, +10 per completed habit, +50 on a
/// perfect day. The interactive toggle flow uses per-toggle deltas instead;
/// this is the lump-sum alternative for batch crediting.
pub fn completion_bonus(completed: usize, total: usize) -> u64 {
    let perfect = total > 0 && completed == total;
    DAILY_BONUS_BASE
        + DAILY_BONUS_PER_HABIT * completed as u64
        + if perfect { PERFECT_DAY_BONUS } else { 0 }
}
