//! Shared coordinator state
//!
//! Thread-safe shared state for music coordination between the decision
//! engine, the host-facing adapters, and event subscribers.

use crate::events::{EventBus, GlmcEvent};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};

/// Music playback decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicState {
    Playing,
    Paused,
    Stopped,
}

impl std::fmt::Display for MusicState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MusicState::Playing => write!(f, "playing"),
            MusicState::Paused => write!(f, "paused"),
            MusicState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Shared state accessible by all components
///
/// Uses RwLock for concurrent read access with rare writes.
pub struct SharedState {
    /// Last emitted playback decision (Playing, Paused, or Stopped)
    music_state: RwLock<MusicState>,

    /// Event broadcaster for coordinator events
    events: EventBus,

    /// Overlay watchdog trip counter
    ///
    /// Tracks how many times the watchdog had to force-clear a stuck overlay
    /// flag. Diagnostic only; a non-zero count means the overlay driver
    /// stopped refreshing its state.
    watchdog_trips: AtomicU64,
}

impl SharedState {
    /// Create new shared state with default values
    pub fn new() -> Self {
        Self {
            // Nothing is selected at startup, so there is nothing to play yet
            music_state: RwLock::new(MusicState::Stopped),
            events: EventBus::new(100),
            watchdog_trips: AtomicU64::new(0),
        }
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: GlmcEvent) {
        // No receivers is OK
        self.events.emit_lossy(event);
    }

    /// Subscribe to the coordinator event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<GlmcEvent> {
        self.events.subscribe()
    }

    /// Get the last emitted playback decision
    pub async fn music_state(&self) -> MusicState {
        *self.music_state.read().await
    }

    /// Replace the playback decision, returning the previous one
    pub async fn swap_music_state(&self, state: MusicState) -> MusicState {
        let mut guard = self.music_state.write().await;
        std::mem::replace(&mut *guard, state)
    }

    /// Increment the watchdog trip counter, returning the new total
    pub fn increment_watchdog_trips(&self) -> u64 {
        self.watchdog_trips.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Total watchdog trips since startup
    pub fn watchdog_trips(&self) -> u64 {
        self.watchdog_trips.load(Ordering::Relaxed)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
