//! Event types and event bus for glmc
//!
//! Components communicate outward through a single broadcast bus:
//! - **EventBus** (tokio::broadcast): one-to-many event fan-out
//! - **Shared state** (`Arc<RwLock<T>>`): read-heavy access
//!
//! Events carry timestamps and can be serialized for log shipping or a
//! host-side diagnostics view.

use crate::coordinator::PauseSource;
use crate::state::MusicState;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Coordinator event types
///
/// Events are broadcast via EventBus and can be serialized for transmission
/// to a host diagnostics surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GlmcEvent {
    /// Playback decision changed (Playing / Paused / Stopped)
    MusicStateChanged {
        /// Decision before change
        old_state: MusicState,
        /// Decision after change
        new_state: MusicState,
        /// When the decision changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The set of active pause sources changed
    PauseSourcesChanged {
        /// Active sources after the change
        sources: Vec<PauseSource>,
        /// When the set changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Debounced video activity flag changed
    VideoActivityChanged {
        /// Whether a video is now considered playing
        playing: bool,
        /// When the flag changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Theme overlay flag changed
    OverlayChanged {
        /// Whether the overlay is now active
        active: bool,
        /// When the flag changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Overlay watchdog force-cleared a stuck overlay flag
    ///
    /// Diagnostic only - the watchdog is a defensive backstop, not the
    /// primary clearing path.
    WatchdogTripped {
        /// Total trips since startup
        trips_total: u64,
        /// When the watchdog tripped
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Settings instance was atomically replaced
    SettingsReplaced {
        /// Settings revision after the swap
        revision: u64,
        /// When the swap occurred
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The committed game selection changed
    SelectionChanged {
        /// Newly selected game
        game_id: Uuid,
        /// When the selection was committed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl GlmcEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            GlmcEvent::MusicStateChanged { .. } => "MusicStateChanged",
            GlmcEvent::PauseSourcesChanged { .. } => "PauseSourcesChanged",
            GlmcEvent::VideoActivityChanged { .. } => "VideoActivityChanged",
            GlmcEvent::OverlayChanged { .. } => "OverlayChanged",
            GlmcEvent::WatchdogTripped { .. } => "WatchdogTripped",
            GlmcEvent::SettingsReplaced { .. } => "SettingsReplaced",
            GlmcEvent::SelectionChanged { .. } => "SelectionChanged",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GlmcEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<GlmcEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: GlmcEvent) -> Result<usize, broadcast::error::SendError<GlmcEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: GlmcEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
