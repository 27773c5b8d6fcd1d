//! Remote profile mirroring.
//!
//! A profile can be mirrored to a remote document store keyed by user id.
//! Conflict resolution is last-writer-wins on the aggregate's `updated_at`
//! stamp: at boot the remote copy is adopted only when it is strictly
//! newer than the local one, and every successful local save pushes the
//! current state back up. The store itself sits behind a trait so tests
//! and native builds can swap backends without touching the systems.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use crate::save::{load_profile_at_boot, SaveCompleteEvent};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent once boot reconciliation has finished.
#[derive(Event, Debug, Clone)]
pub struct SyncCompleteEvent {
    pub adopted_remote: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Unavailable(String),
    Serde(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Unavailable(msg) => write!(f, "Remote store unavailable: {msg}"),
            SyncError::Serde(msg) => write!(f, "Remote document encoding failed: {msg}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// THE REMOTE STORE SEAM
// ═══════════════════════════════════════════════════════════════════════

/// One mirrored profile as the remote sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteDocument {
    pub updated_at: i64,
    pub progress: ChallengeProgress,
    pub stats: ChallengeStats,
}

impl RemoteDocument {
    pub fn snapshot(progress: &ChallengeProgress, stats: &ChallengeStats) -> Self {
        Self {
            updated_at: progress.updated_at,
            progress: progress.clone(),
            stats: stats.clone(),
        }
    }
}

pub trait RemoteStore: Send + Sync {
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteDocument>, SyncError>;
    fn upsert(&self, user_id: &str, doc: &RemoteDocument) -> Result<(), SyncError>;
}

/// The live backend. Defaults to the in-memory store, which makes sync a
/// harmless mirror on installs with no remote configured.
#[derive(Resource)]
pub struct RemoteStoreHandle {
    pub store: Box<dyn RemoteStore>,
}

impl Default for RemoteStoreHandle {
    fn default() -> Self {
        Self {
            store: Box::new(InMemoryRemoteStore::default()),
        }
    }
}

/// Process-local store, used as the default backend and in tests.
#[derive(Default)]
pub struct InMemoryRemoteStore {
    docs: Mutex<HashMap<String, RemoteDocument>>,
}

impl RemoteStore for InMemoryRemoteStore {
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteDocument>, SyncError> {
        let docs = self
            .docs
            .lock()
            .map_err(|e| SyncError::Unavailable(e.to_string()))?;
        Ok(docs.get(user_id).cloned())
    }

    fn upsert(&self, user_id: &str, doc: &RemoteDocument) -> Result<(), SyncError> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|e| SyncError::Unavailable(e.to_string()))?;
        docs.insert(user_id.to_string(), doc.clone());
        Ok(())
    }
}

/// Directory-backed store, one JSON document per user id. Stands in for a
/// real service on native builds that point it at a synced folder.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileRemoteStore {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileRemoteStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn doc_path(&self, user_id: &str) -> std::path::PathBuf {
        self.root.join(format!("{user_id}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RemoteStore for FileRemoteStore {
    fn fetch(&self, user_id: &str) -> Result<Option<RemoteDocument>, SyncError> {
        let path = self.doc_path(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let json =
            std::fs::read_to_string(&path).map_err(|e| SyncError::Unavailable(e.to_string()))?;
        let doc: RemoteDocument =
            serde_json::from_str(&json).map_err(|e| SyncError::Serde(e.to_string()))?;
        Ok(Some(doc))
    }

    fn upsert(&self, user_id: &str, doc: &RemoteDocument) -> Result<(), SyncError> {
        std::fs::create_dir_all(&self.root).map_err(|e| SyncError::Unavailable(e.to_string()))?;
        let json =
            serde_json::to_string_pretty(doc).map_err(|e| SyncError::Serde(e.to_string()))?;
        let path = self.doc_path(user_id);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| SyncError::Unavailable(e.to_string()))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| SyncError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

/// LWW predicate: adopt only a strictly newer remote. Equal stamps keep
/// the local copy.
pub fn remote_is_newer(remote: &RemoteDocument, local: &ChallengeProgress) -> bool {
    remote.updated_at > local.updated_at
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SyncPlugin;

impl Plugin for SyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RemoteStoreHandle>()
            .add_event::<SyncCompleteEvent>()
            .add_systems(
                OnEnter(AppState::Loading),
                reconcile_remote_at_boot.after(load_profile_at_boot),
            )
            .add_systems(Update, push_after_save);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Boot reconciliation: compare the freshly loaded local profile with the
/// remote copy and keep whichever was updated last. A sync failure never
/// blocks boot; the local profile stays authoritative.
pub fn reconcile_remote_at_boot(
    handle: Res<RemoteStoreHandle>,
    mut progress: ResMut<ChallengeProgress>,
    mut stats: ResMut<ChallengeStats>,
    mut viewed: ResMut<ViewedDay>,
    settings: Res<UserSettings>,
    mut sync_events: EventWriter<SyncCompleteEvent>,
) {
    let mut adopted_remote = false;
    match handle.store.fetch(&settings.user_id) {
        Ok(Some(doc)) if remote_is_newer(&doc, &progress) => {
            info!(
                "[Sync] Remote profile is newer ({} > {}); adopting it.",
                doc.updated_at, progress.updated_at
            );
            viewed.0 = doc.progress.current_day;
            *progress = doc.progress;
            *stats = doc.stats;
            adopted_remote = true;
        }
        Ok(_) => {
            // Local wins (or no remote copy yet): push it up.
            let doc = RemoteDocument::snapshot(&progress, &stats);
            if let Err(e) = handle.store.upsert(&settings.user_id, &doc) {
                warn!("[Sync] Initial push failed: {e}");
            } else {
                info!("[Sync] Local profile pushed to remote.");
            }
        }
        Err(e) => {
            warn!("[Sync] Remote fetch failed ({e}); keeping local profile.");
        }
    }
    sync_events.send(SyncCompleteEvent { adopted_remote });
}

/// Mirrors every successful save to the remote. Riding the save pipeline
/// reuses its debounce, so bursts of mutations become one push.
pub fn push_after_save(
    mut save_events: EventReader<SaveCompleteEvent>,
    handle: Res<RemoteStoreHandle>,
    progress: Res<ChallengeProgress>,
    stats: Res<ChallengeStats>,
    settings: Res<UserSettings>,
) {
    if !save_events.read().any(|ev| ev.success) {
        return;
    }
    let doc = RemoteDocument::snapshot(&progress, &stats);
    if let Err(e) = handle.store.upsert(&settings.user_id, &doc) {
        warn!("[Sync] Push failed: {e}");
    }
}
