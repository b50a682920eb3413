//! Video activity debounce
//!
//! Media elements fire spurious stop/start pairs during normal seeking and
//! looping. Clearing the "video is playing" flag on the first stop signal
//! would make the coordinator flicker pause/resume audibly, so the clear is
//! delayed behind a grace countdown measured in poll ticks. Starting is the
//! fast path: pausing music early is harmless, so the flag goes up
//! immediately.

use tracing::debug;

/// Grace countdown state
///
/// Modeled as an explicit state machine rather than ad hoc booleans so the
/// debounce is testable in isolation from real timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceState {
    /// No countdown pending
    Idle,
    /// A stop signal was seen; the flag clears when the countdown expires
    Armed { remaining: u32 },
}

/// Derives a stable "a video is currently playing" flag from raw,
/// possibly-flickering media-element signals
#[derive(Debug)]
pub struct VideoActivityTracker {
    playing: bool,
    grace: GraceState,
    grace_ticks: u32,
}

impl VideoActivityTracker {
    pub fn new(grace_ticks: u32) -> Self {
        Self {
            playing: false,
            grace: GraceState::Idle,
            grace_ticks,
        }
    }

    /// Raw "video started" signal
    ///
    /// Sets the derived flag immediately and cancels any pending grace
    /// countdown - when started and stopped signals race, started wins.
    /// Returns true if the flag changed.
    pub fn on_started(&mut self) -> bool {
        if self.grace != GraceState::Idle {
            debug!("Video start signal cancels pending grace countdown");
        }
        self.grace = GraceState::Idle;

        if self.playing {
            false
        } else {
            self.playing = true;
            true
        }
    }

    /// Raw "video stopped" signal
    ///
    /// Does not clear the flag; arms (or re-arms) the grace countdown.
    pub fn on_stopped(&mut self) {
        if self.playing {
            self.grace = GraceState::Armed {
                remaining: self.grace_ticks,
            };
            debug!("Video stop signal received, grace countdown armed ({} ticks)", self.grace_ticks);
        }
    }

    /// Advance the countdown by one poll tick
    ///
    /// Returns true exactly when the countdown completes and the flag flips
    /// to false.
    pub fn on_tick(&mut self) -> bool {
        match self.grace {
            GraceState::Idle => false,
            GraceState::Armed { remaining } => {
                if remaining <= 1 {
                    self.grace = GraceState::Idle;
                    self.playing = false;
                    debug!("Video grace countdown expired, flag cleared");
                    true
                } else {
                    self.grace = GraceState::Armed {
                        remaining: remaining - 1,
                    };
                    false
                }
            }
        }
    }

    /// The debounced flag
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current countdown state
    pub fn grace_state(&self) -> GraceState {
        self.grace
    }

    /// Applied on settings reload; affects future countdowns only
    pub fn set_grace_ticks(&mut self, grace_ticks: u32) {
        self.grace_ticks = grace_ticks;
    }
}
