//! Current-settings cell and change-notification collapsing
//!
//! Exactly one `Settings` instance is current at any time. All readers
//! dereference through this cell per evaluation and never cache the
//! pointee across a reload boundary; `replace` swaps the whole instance
//! atomically and the old one becomes inert.
//!
//! Hosts sometimes wire two listeners to one underlying property (the raw
//! settings object and a relay layer). Running a transition twice for the
//! same mutation corrupts in-flight fade state, so `note_changed` collapses
//! duplicate notifications: it answers true at most once per
//! (revision, key) pair.

use crate::config::Settings;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::debug;

/// Keys for settings property-change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    PauseOnFocusLoss,
    PauseOnMinimize,
    PauseWhenInTray,
    MusicVolume,
    FadeTiming,
    MediaPolling,
    VideoGrace,
    OverlayTimeout,
    SelectionSettle,
}

pub struct SettingsSync {
    /// Single-owner cell for the current instance
    current: RwLock<Arc<Settings>>,

    /// Bumped on every mutation (replace or runtime-flag flip)
    revision: AtomicU64,

    /// Keys already notified for the current revision
    seen: Mutex<(u64, HashSet<SettingKey>)>,

    /// One-shot guard for permanent host registrations
    attached: AtomicBool,
}

impl SettingsSync {
    pub fn new(initial: Settings) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            revision: AtomicU64::new(0),
            seen: Mutex::new((0, HashSet::new())),
            attached: AtomicBool::new(false),
        }
    }

    /// Current settings snapshot
    ///
    /// Valid for one evaluation; re-read per evaluation rather than caching.
    pub async fn current(&self) -> Arc<Settings> {
        self.current.read().await.clone()
    }

    /// Atomically swap in a freshly loaded instance
    ///
    /// Must be invoked unconditionally on every reload notification so no
    /// component is left pointing at an orphaned instance. The runtime-only
    /// flags are re-derived from live tracker state, never taken from the
    /// incoming instance. Returns the new revision.
    pub async fn replace(
        &self,
        mut incoming: Settings,
        video_active: bool,
        overlay_active: bool,
    ) -> u64 {
        incoming.video_is_playing = video_active;
        incoming.theme_overlay_active = overlay_active;
        incoming.music_volume = incoming.music_volume.clamp(0.0, 1.0);

        *self.current.write().await = Arc::new(incoming);
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Copy-on-write update for the runtime-only flags
    ///
    /// Readers holding the previous Arc see a consistent (if stale)
    /// snapshot; there is no torn state.
    pub async fn update_runtime<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.current.write().await;
        let mut next = (**guard).clone();
        mutate(&mut next);
        *guard = Arc::new(next);
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a property-change notification
    ///
    /// Returns true exactly once per (revision, key) pair; a duplicate
    /// notification for the same underlying mutation returns false.
    pub fn note_changed(&self, key: SettingKey) -> bool {
        let revision = self.revision.load(Ordering::SeqCst);
        let mut seen = self.seen.lock().unwrap();
        if seen.0 != revision {
            seen.0 = revision;
            seen.1.clear();
        }
        let fresh = seen.1.insert(key);
        if !fresh {
            debug!("Duplicate change notification for {:?} collapsed", key);
        }
        fresh
    }

    /// One-shot guard for permanent, non-revocable registrations
    ///
    /// The first call returns true; every later call is a no-op returning
    /// false, so repeated attach requests never register a second handler
    /// or orphan a second timer.
    pub fn attach(&self) -> bool {
        !self.attached.swap(true, Ordering::SeqCst)
    }

    /// Current settings revision
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}
