//! Shared types, resources, events, and states for Emberline.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ═══════════════════════════════════════════════════════════════════════
// APP STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum AppState {
    #[default]
    Loading,
    MainMenu,
    Tracking,
    Journal,
    Shop,
    Focus,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// HABITS
// ═══════════════════════════════════════════════════════════════════════

pub type HabitId = String;

/// A tracked daily habit. The id is stable for the lifetime of the
/// challenge; label, description, and icon are freely editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub label: String,
    pub description: String,
    pub icon: String,
}

impl Habit {
    pub fn new(id: &str, label: &str, description: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DAY RECORDS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Great,
    Good,
    Neutral,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Great,
        Mood::Good,
        Mood::Neutral,
        Mood::Bad,
        Mood::Terrible,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Neutral => "Neutral",
            Mood::Bad => "Bad",
            Mood::Terrible => "Terrible",
        }
    }

    /// Cycle order used by the mood key: unset, then each mood, then unset.
    pub fn cycle(current: Option<Mood>) -> Option<Mood> {
        match current {
            None => Some(Mood::Great),
            Some(Mood::Great) => Some(Mood::Good),
            Some(Mood::Good) => Some(Mood::Neutral),
            Some(Mood::Neutral) => Some(Mood::Bad),
            Some(Mood::Bad) => Some(Mood::Terrible),
            Some(Mood::Terrible) => None,
        }
    }
}

/// Why a day is frozen. Display-only distinction; both satisfy the same
/// completeness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeReason {
    Manual,
    TimeWarp,
}

impl FreezeReason {
    pub fn label(self) -> &'static str {
        match self {
            FreezeReason::Manual => "manual",
            FreezeReason::TimeWarp => "Time Warp Redemption",
        }
    }
}

/// Everything recorded against one challenge day. Created lazily on the
/// first write for that day index; never deleted except by a full reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayRecord {
    /// ISO-8601 calendar date, stamped when the record is first created.
    pub date: String,
    /// Habit ids marked done. Ids of since-deleted habits may linger here.
    pub completed_habits: BTreeSet<HabitId>,
    /// Optional free-text log per habit.
    pub habit_logs: BTreeMap<HabitId, String>,
    pub notes: String,
    pub mood: Option<Mood>,
    /// Opaque reference to an attached photo (path or blob key).
    pub photo: Option<String>,
    pub frozen: bool,
    pub freeze_reason: Option<FreezeReason>,
}

impl DayRecord {
    pub fn new(date: String) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BADGES
// ═══════════════════════════════════════════════════════════════════════

/// Closed set of badge ids. Badge metadata lives in the catalog table and
/// is resolved through explicit lookup, never by string reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    FirstStep,
    WeekWarrior,
    HalfwayHero,
    StrictMaster,
    ProjectElite,
}

/// A held badge. The badge list on progress is append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeAward {
    pub id: BadgeId,
    /// Epoch milliseconds at unlock.
    pub unlocked_at: i64,
}

// ═══════════════════════════════════════════════════════════════════════
// SHOP
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItemId {
    StreakFreeze,
    StreakRepair,
}

// ═══════════════════════════════════════════════════════════════════════
// CHALLENGE PROGRESS: the aggregate root
// ═══════════════════════════════════════════════════════════════════════

/// Single source of truth for one running challenge. All mutation goes
/// through the operations in `progress::ops`, which take the current value
/// and return a fully recomputed replacement.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    /// 1-based index of today within the challenge.
    pub current_day: u32,
    pub total_days: u32,
    /// Calendar date of day 1.
    pub start_date: NaiveDate,
    /// Day index -> record. Sparse; untouched days have no entry.
    pub history: BTreeMap<u32, DayRecord>,
    /// The active habit list, in display order.
    pub habits: Vec<Habit>,
    /// Experience doubles as the shop currency.
    pub xp: u64,
    /// Cached `level_for_xp(xp)`; recomputed on every mutation.
    pub level: u32,
    /// Append-only, in unlock order.
    pub badges: Vec<BadgeAward>,
    /// Streak freeze inventory, bought in the shop.
    pub streak_freezes: u32,
    pub strict_mode: bool,
    /// Epoch milliseconds of the last committed mutation. Drives
    /// last-write-wins reconciliation against the remote copy.
    pub updated_at: i64,
}

impl Default for ChallengeProgress {
    fn default() -> Self {
        Self {
            current_day: 1,
            total_days: DEFAULT_TOTAL_DAYS,
            start_date: NaiveDate::default(),
            history: BTreeMap::new(),
            habits: Vec::new(),
            xp: 0,
            level: 1,
            badges: Vec::new(),
            streak_freezes: 0,
            strict_mode: false,
            updated_at: 0,
        }
    }
}

impl ChallengeProgress {
    pub fn day_record(&self, day: u32) -> Option<&DayRecord> {
        self.history.get(&day)
    }

    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badges.iter().any(|award| award.id == id)
    }

    pub fn has_habit(&self, habit_id: &str) -> bool {
        self.habits.iter().any(|habit| habit.id == habit_id)
    }

    /// Calendar date of the given 1-based day index.
    pub fn date_for_day(&self, day: u32) -> NaiveDate {
        self.start_date + Duration::days(day.saturating_sub(1) as i64)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CHALLENGE TEMPLATES
// ═══════════════════════════════════════════════════════════════════════

/// A prebuilt challenge definition offered at onboarding. Habits are
/// copied into the progress aggregate and customizable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub total_days: u32,
    pub strict_mode: bool,
    pub habits: Vec<Habit>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateRegistry {
    pub templates: Vec<ChallengeTemplate>,
}

impl TemplateRegistry {
    pub fn get(&self, id: &str) -> Option<&ChallengeTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AFFIRMATIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffirmationContext {
    DayStart,
    BadgeUnlocked,
    StreakMilestone,
    Comeback,
}

/// Static affirmation line pools, keyed by context. Populated by the data
/// plugin; consumed by the coach as the offline text source.
#[derive(Resource, Debug, Clone, Default)]
pub struct AffirmationRegistry {
    pub pools: HashMap<AffirmationContext, Vec<String>>,
}

// ═══════════════════════════════════════════════════════════════════════
// STATS: passive lifetime counters
// ═══════════════════════════════════════════════════════════════════════

/// Lifetime counters across the profile. Updated by event listeners,
/// persisted alongside progress, never read back by the engines.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChallengeStats {
    pub habits_completed: u64,
    pub habits_unchecked: u64,
    pub journal_entries: u64,
    pub focus_sessions: u64,
    pub focus_minutes: u64,
    pub freezes_used: u64,
    pub repairs_bought: u64,
    pub days_advanced: u64,
    pub xp_earned: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// USER SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Per-install identity. The user id keys the remote document.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub display_name: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            display_name: "Challenger".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FOCUS SESSION
// ═══════════════════════════════════════════════════════════════════════

/// Countdown state for the focus timer. Inactive between sessions.
#[derive(Resource, Debug, Clone)]
pub struct FocusSession {
    pub active: bool,
    pub planned_minutes: u32,
    pub remaining_secs: f32,
}

impl Default for FocusSession {
    fn default() -> Self {
        Self {
            active: false,
            planned_minutes: DEFAULT_FOCUS_MINUTES,
            remaining_secs: 0.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// VIEWED DAY: which day the tracking/journal screens show
// ═══════════════════════════════════════════════════════════════════════

/// The day index under review. Input clamps it to `1..=current_day`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewedDay(pub u32);

impl Default for ViewedDay {
    fn default() -> Self {
        ViewedDay(1)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REQUEST EVENTS: intents from input/UI, consumed by domain systems
// ═══════════════════════════════════════════════════════════════════════

/// Flip one habit's done-mark for a day.
#[derive(Event, Debug, Clone)]
pub struct ToggleHabitEvent {
    pub day: u32,
    pub habit_id: HabitId,
}

#[derive(Event, Debug, Clone)]
pub struct SetMoodEvent {
    pub day: u32,
    pub mood: Option<Mood>,
}

#[derive(Event, Debug, Clone)]
pub struct SetNotesEvent {
    pub day: u32,
    pub notes: String,
}

#[derive(Event, Debug, Clone)]
pub struct AttachPhotoEvent {
    pub day: u32,
    pub photo: Option<String>,
}

/// Free-text log attached to one habit on one day.
#[derive(Event, Debug, Clone)]
pub struct LogHabitEvent {
    pub day: u32,
    pub habit_id: HabitId,
    pub text: String,
}

#[derive(Event, Debug, Clone)]
pub struct AddHabitEvent {
    pub label: String,
    pub description: String,
    pub icon: String,
}

/// Partial edit; `None` fields are left unchanged.
#[derive(Event, Debug, Clone)]
pub struct EditHabitEvent {
    pub habit_id: HabitId,
    pub label: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Removes the definition only. History keeps the id.
#[derive(Event, Debug, Clone)]
pub struct RemoveHabitEvent {
    pub habit_id: HabitId,
}

#[derive(Event, Debug, Clone)]
pub struct PurchaseRequestEvent {
    pub item: ShopItemId,
}

/// Freeze or un-freeze the current day, whichever applies.
#[derive(Event, Debug, Clone)]
pub struct FreezeToggleEvent;

/// Step the challenge forward one day. Sent by the calendar when the wall
/// clock has moved past the stored day, or by the end-day key.
#[derive(Event, Debug, Clone)]
pub struct AdvanceDayEvent;

/// Discard all progress and start over from a template.
#[derive(Event, Debug, Clone)]
pub struct ResetChallengeEvent {
    pub template_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct StartFocusEvent {
    pub minutes: u32,
}

#[derive(Event, Debug, Clone)]
pub struct CancelFocusEvent;

// ═══════════════════════════════════════════════════════════════════════
// NOTIFICATION EVENTS: facts about committed mutations
// ═══════════════════════════════════════════════════════════════════════

/// A habit mark changed and the mutation committed.
#[derive(Event, Debug, Clone)]
pub struct HabitToggledEvent {
    pub day: u32,
    pub habit_id: HabitId,
    pub now_marked: bool,
    pub day_complete: bool,
}

/// Informational; fired for every committed xp delta.
#[derive(Event, Debug, Clone)]
pub struct XpChangeEvent {
    pub delta: i64,
}

/// Fired at most once per committed mutation, naming the final level.
#[derive(Event, Debug, Clone)]
pub struct LevelUpEvent {
    pub level: u32,
}

/// One per newly unlocked badge, in catalog order.
#[derive(Event, Debug, Clone)]
pub struct BadgeUnlockedEvent {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
}

#[derive(Event, Debug, Clone)]
pub struct PurchaseCompleteEvent {
    pub item: ShopItemId,
    pub cost: u64,
}

/// The current day's frozen flag changed.
#[derive(Event, Debug, Clone)]
pub struct DayFrozenEvent {
    pub day: u32,
    pub frozen: bool,
    pub reason: Option<FreezeReason>,
}

#[derive(Event, Debug, Clone)]
pub struct DayAdvancedEvent {
    pub day: u32,
}

/// A natural (uncancelled) focus session ran to zero.
#[derive(Event, Debug, Clone)]
pub struct FocusSessionCompleteEvent {
    pub minutes: u32,
}

/// Any committed mutation of the progress aggregate. Drives autosave and
/// the remote push.
#[derive(Event, Debug, Clone)]
pub struct ProgressMutatedEvent;

/// A line from the coach, bound for the toast stack.
#[derive(Event, Debug, Clone)]
pub struct AffirmationEvent {
    pub text: String,
}

/// Toast notification for user feedback.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// PROFILE FILE: what the save layer writes
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFile {
    pub version: u32,
    /// Epoch milliseconds at write time.
    pub saved_at: i64,
    pub user_id: String,
    pub progress: ChallengeProgress,
    pub stats: ChallengeStats,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const DEFAULT_TOTAL_DAYS: u32 = 50;

pub const XP_PER_HABIT: u64 = 10;
pub const FOCUS_XP_PER_MINUTE: u64 = 2;
pub const DAILY_BONUS_BASE: u64 = 50;
pub const DAILY_BONUS_PER_HABIT: u64 = 10;
pub const PERFECT_DAY_BONUS: u64 = 50;
/// Quadratic base of the level curve: level N starts at 100·(N−1)² xp.
pub const XP_PER_LEVEL_STEP: u64 = 100;

pub const STREAK_FREEZE_COST: u64 = 500;
pub const STREAK_REPAIR_COST: u64 = 1000;

pub const WEEK_WARRIOR_SPAN: u32 = 7;
pub const STRICT_MASTER_DAYS: u32 = 10;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

// ═══════════════════════════════════════════════════════════════════════
// TIME HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// Wall-clock epoch milliseconds. The `updated_at` stamp on every committed
/// mutation comes from here.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_cycle_visits_every_mood_and_returns_to_unset() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            current = Mood::cycle(current);
            if let Some(mood) = current {
                seen.push(mood);
            }
        }
        assert_eq!(seen, Mood::ALL.to_vec(), "cycle should visit all moods in order");
        assert_eq!(current, None, "cycle should wrap back to unset");
    }

    #[test]
    fn date_for_day_offsets_from_start_date() {
        let progress = ChallengeProgress {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            progress.date_for_day(1),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            "day 1 is the start date itself"
        );
        assert_eq!(
            progress.date_for_day(31),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
    }

    #[test]
    fn freeze_reason_labels_match_display_contract() {
        assert_eq!(FreezeReason::Manual.label(), "manual");
        assert_eq!(FreezeReason::TimeWarp.label(), "Time Warp Redemption");
    }
}
