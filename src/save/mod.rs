//! Profile persistence.
//!
//! One versioned JSON profile per install. Native builds write next to the
//! executable through a temp-file-and-rename so a crash mid-write never
//! corrupts the profile; wasm builds use browser localStorage. Saving is
//! fire-and-forget relative to the aggregate: a mutation is complete the
//! moment the new value is committed, whether or not the write lands.

use bevy::prelude::*;
use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;
#[cfg(not(target_arch = "wasm32"))]
const PROFILE_FILE_NAME: &str = "profile.json";
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "emberline_profile";

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by autosave, the day-advance hook, or the quicksave keybind.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

/// Sent after a save attempt (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The backing store rejected the write for lack of space. The
    /// in-memory state stays authoritative; only persistence failed.
    QuotaExceeded,
    /// No profile exists yet.
    NotFound,
    StorageUnavailable,
    Io(String),
    Serde(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::QuotaExceeded => write!(f, "Storage is full; progress is safe in memory"),
            SaveError::NotFound => write!(f, "No saved profile found"),
            SaveError::StorageUnavailable => write!(f, "Persistent storage is unavailable"),
            SaveError::Io(msg) => write!(f, "Profile write failed: {msg}"),
            SaveError::Serde(msg) => write!(f, "Profile encoding failed: {msg}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Collapses bursts of mutations into at most one write per second.
#[derive(Resource)]
pub struct AutosaveDebounce {
    pub pending: bool,
    pub timer: Timer,
}

impl Default for AutosaveDebounce {
    fn default() -> Self {
        Self {
            pending: false,
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutosaveDebounce>()
            .add_event::<SaveRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            // Boot: adopt the stored profile before the menu shows. Runs
            // after the registries so a missing profile can fall back to
            // template defaults.
            .add_systems(
                OnEnter(AppState::Loading),
                load_profile_at_boot.after(crate::data::load_all_data),
            )
            // The save pipeline stays ungated: mutations can commit from
            // Tracking, Journal, Shop, or a menu reset, and all of them
            // must reach disk. Chained so a request raised earlier in the
            // frame is written in the same frame.
            .add_systems(
                Update,
                (
                    queue_autosave_on_mutation,
                    tick_autosave,
                    autosave_on_day_advance,
                    handle_save_requests,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                quicksave_keybind
                    .run_if(in_state(AppState::Tracking).or(in_state(AppState::Paused))),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM / STORAGE HELPERS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn profile_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join(PROFILE_FILE_NAME)
}

fn build_profile(
    progress: &ChallengeProgress,
    stats: &ChallengeStats,
    settings: &UserSettings,
) -> ProfileFile {
    ProfileFile {
        version: SAVE_VERSION,
        saved_at: now_millis(),
        user_id: settings.user_id.clone(),
        progress: progress.clone(),
        stats: stats.clone(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_profile_to(path: &Path, file: &ProfileFile) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(file).map_err(|e| SaveError::Serde(e.to_string()))?;

    // Write to a temp file first, then rename for atomicity.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json).map_err(|e| SaveError::Io(e.to_string()))?;
    fs::rename(&tmp_path, path).map_err(|e| SaveError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn read_profile_from(path: &Path) -> Result<ProfileFile, SaveError> {
    if !path.exists() {
        return Err(SaveError::NotFound);
    }
    let json = fs::read_to_string(path).map_err(|e| SaveError::Io(e.to_string()))?;
    let file: ProfileFile =
        serde_json::from_str(&json).map_err(|e| SaveError::Serde(e.to_string()))?;

    // Version check; future versions can add a migration here.
    if file.version != SAVE_VERSION {
        warn!(
            "Profile has version {} but current version is {}. Attempting to load anyway.",
            file.version, SAVE_VERSION
        );
    }
    Ok(file)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_profile(file: &ProfileFile) -> Result<(), SaveError> {
    write_profile_to(&profile_path(), file)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_profile() -> Result<ProfileFile, SaveError> {
    read_profile_from(&profile_path())
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, SaveError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(SaveError::StorageUnavailable)
}

#[cfg(target_arch = "wasm32")]
pub fn write_profile(file: &ProfileFile) -> Result<(), SaveError> {
    let json = serde_json::to_string(file).map_err(|e| SaveError::Serde(e.to_string()))?;
    let storage = local_storage()?;
    // A rejected setItem is the browser's quota error.
    storage
        .set_item(STORAGE_KEY, &json)
        .map_err(|_| SaveError::QuotaExceeded)
}

#[cfg(target_arch = "wasm32")]
pub fn read_profile() -> Result<ProfileFile, SaveError> {
    let storage = local_storage()?;
    let json = storage
        .get_item(STORAGE_KEY)
        .map_err(|_| SaveError::StorageUnavailable)?
        .ok_or(SaveError::NotFound)?;
    let file: ProfileFile =
        serde_json::from_str(&json).map_err(|e| SaveError::Serde(e.to_string()))?;
    if file.version != SAVE_VERSION {
        warn!(
            "Profile has version {} but current version is {}. Attempting to load anyway.",
            file.version, SAVE_VERSION
        );
    }
    Ok(file)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Adopt the stored profile into the live resources, if one exists. A
/// missing or unreadable profile is not an error at boot; the menu will
/// offer a fresh challenge instead.
pub fn load_profile_at_boot(
    mut progress: ResMut<ChallengeProgress>,
    mut stats: ResMut<ChallengeStats>,
    mut settings: ResMut<UserSettings>,
    mut viewed: ResMut<ViewedDay>,
) {
    match read_profile() {
        Ok(file) => {
            info!(
                "Profile loaded: day {}/{}, level {}, {} xp, saved_at {}",
                file.progress.current_day,
                file.progress.total_days,
                file.progress.level,
                file.progress.xp,
                file.saved_at
            );
            viewed.0 = file.progress.current_day;
            settings.user_id = file.user_id.clone();
            *progress = file.progress;
            *stats = file.stats;
        }
        Err(SaveError::NotFound) => {
            info!("No profile on disk; starting fresh.");
        }
        Err(e) => {
            warn!("Profile load failed ({e}); starting fresh.");
        }
    }
}

/// Marks the debounce dirty on every committed mutation.
pub fn queue_autosave_on_mutation(
    mut mutations: EventReader<ProgressMutatedEvent>,
    mut debounce: ResMut<AutosaveDebounce>,
) {
    if mutations.read().count() > 0 {
        debounce.pending = true;
    }
}

/// Flushes at most one save request per debounce interval.
pub fn tick_autosave(
    time: Res<Time>,
    mut debounce: ResMut<AutosaveDebounce>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    debounce.timer.tick(time.delta());
    if debounce.timer.just_finished() && debounce.pending {
        debounce.pending = false;
        save_writer.send(SaveRequestEvent);
    }
}

/// Day rollover always saves immediately, debounce aside.
pub fn autosave_on_day_advance(
    mut advanced: EventReader<DayAdvancedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    for ev in advanced.read() {
        info!("Autosaving at day {}", ev.day);
        save_writer.send(SaveRequestEvent);
    }
}

pub fn handle_save_requests(
    mut requests: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut toasts: EventWriter<ToastEvent>,
    progress: Res<ChallengeProgress>,
    stats: Res<ChallengeStats>,
    settings: Res<UserSettings>,
) {
    if requests.read().count() == 0 {
        return;
    }
    // Coalesce multiple requests in one frame into a single write.
    let file = build_profile(&progress, &stats, &settings);
    match write_profile(&file) {
        Ok(()) => {
            complete_events.send(SaveCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Err(e) => {
            warn!("Profile save FAILED: {e}");
            toasts.send(ToastEvent {
                message: e.to_string(),
                duration_secs: 3.0,
            });
            complete_events.send(SaveCompleteEvent {
                success: false,
                error_message: Some(e.to_string()),
            });
        }
    }
}

/// F5 forces an immediate save.
pub fn quicksave_keybind(
    keys: Res<ButtonInput<KeyCode>>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    if keys.just_pressed(KeyCode::F5) {
        info!("F5 quicksave");
        save_writer.send(SaveRequestEvent);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_profile() -> ProfileFile {
        let mut progress = ChallengeProgress {
            current_day: 12,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            xp: 730,
            level: 3,
            streak_freezes: 2,
            habits: vec![Habit::new("run", "Run", "5k", "shoe")],
            updated_at: 1_770_000_000_000,
            ..Default::default()
        };
        let mut record = DayRecord::new("2026-02-01".to_string());
        record.completed_habits.insert("run".to_string());
        record.mood = Some(Mood::Good);
        progress.history.insert(1, record);

        ProfileFile {
            version: SAVE_VERSION,
            saved_at: 1_770_000_000_500,
            user_id: "tester".to_string(),
            progress,
            stats: ChallengeStats {
                habits_completed: 40,
                focus_minutes: 250,
                ..Default::default()
            },
        }
    }

    #[test]
    fn profile_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("emberline_save_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile.json");

        let file = sample_profile();
        write_profile_to(&path, &file).unwrap();
        let loaded = read_profile_from(&path).unwrap();

        assert_eq!(loaded.version, SAVE_VERSION);
        assert_eq!(loaded.user_id, "tester");
        assert_eq!(loaded.progress, file.progress, "progress must survive the round trip");
        assert_eq!(loaded.stats.habits_completed, 40);
        assert!(
            !path.with_extension("json.tmp").exists(),
            "temp file must be renamed away"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_profile_reads_as_not_found() {
        let path = std::env::temp_dir().join("emberline_save_test_missing/profile.json");
        assert_eq!(read_profile_from(&path).unwrap_err(), SaveError::NotFound);
    }
}
