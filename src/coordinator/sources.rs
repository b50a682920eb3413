//! Pause source bookkeeping
//!
//! Each pause source is one independent reason demanding that music be
//! paused; several may be active at once. The set is pure runtime state,
//! rebuilt from live conditions after every restart, and is never
//! serialized.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// One independent reason to pause music
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PauseSource {
    /// Launcher window lost focus
    FocusLoss,
    /// Launcher window is minimized
    Minimized,
    /// Launcher is hidden to the system tray
    SystemTray,
    /// A video is playing (debounced)
    Video,
    /// The theme overlay is active
    ThemeOverlay,
    /// Explicit user pause
    Manual,
}

impl PauseSource {
    /// Whether a transient reset wipes this source
    ///
    /// `Video` and `ThemeOverlay` mirror live tracker state: wiping them
    /// while a video is still playing restarts music under the video.
    pub fn is_transient(&self) -> bool {
        !matches!(self, PauseSource::Video | PauseSource::ThemeOverlay)
    }
}

impl std::fmt::Display for PauseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PauseSource::FocusLoss => write!(f, "FocusLoss"),
            PauseSource::Minimized => write!(f, "Minimized"),
            PauseSource::SystemTray => write!(f, "SystemTray"),
            PauseSource::Video => write!(f, "Video"),
            PauseSource::ThemeOverlay => write!(f, "ThemeOverlay"),
            PauseSource::Manual => write!(f, "Manual"),
        }
    }
}

/// The set of currently active pause sources
///
/// Membership is idempotent: adding a present source or removing an absent
/// one is a no-op, never an error. Mutators report whether membership
/// actually changed so callers can skip redundant re-evaluation.
#[derive(Debug, Default)]
pub struct PauseSourceSet {
    active: HashSet<PauseSource>,
}

impl PauseSourceSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a source; no-op if already present
    pub fn add(&mut self, source: PauseSource) -> bool {
        let inserted = self.active.insert(source);
        if inserted {
            debug!("Pause source added: {}", source);
        }
        inserted
    }

    /// Remove a source; no-op if absent
    ///
    /// Always safe to call unconditionally - removal is never gated behind
    /// a settings toggle, so disabling a setting while its source is active
    /// still allows release.
    pub fn remove(&mut self, source: PauseSource) -> bool {
        let removed = self.active.remove(&source);
        if removed {
            debug!("Pause source removed: {}", source);
        }
        removed
    }

    /// Wipe the window-derived and manual sources
    ///
    /// Survivors: `Video` and `ThemeOverlay` (see `PauseSource::is_transient`).
    pub fn clear_transient(&mut self) -> bool {
        let before = self.active.len();
        self.active.retain(|source| !source.is_transient());
        let changed = self.active.len() != before;
        if changed {
            debug!("Transient pause sources cleared ({} remain)", self.active.len());
        }
        changed
    }

    /// Whether no source is demanding a pause
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether a specific source is active
    pub fn contains(&self, source: PauseSource) -> bool {
        self.active.contains(&source)
    }

    /// Sorted snapshot of the active sources, for events and logs
    pub fn snapshot(&self) -> Vec<PauseSource> {
        let mut sources: Vec<PauseSource> = self.active.iter().copied().collect();
        sources.sort();
        sources
    }
}
