//! Game selection settle handling
//!
//! Scrolling through the game list fires a selection event per row; reacting
//! to each one thrashes the audio engine. Selections therefore settle behind
//! a short countdown on the poll clock, with two fast paths:
//!
//! - Desktop mode: the very first selection after the front-end becomes
//!   ready plays immediately (launch should not feel delayed).
//! - Fullscreen mode: the mode switch itself sets an explicit
//!   skip-first-selection flag; only that flag is honored there, so the
//!   generic first-selection path can never apply the skip a second time.

use uuid::Uuid;

/// Host presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Desktop,
    Fullscreen,
}

#[derive(Debug)]
pub(crate) struct SelectionState {
    mode: PresentationMode,
    current: Option<Uuid>,
    pending: Option<Uuid>,
    settle_remaining: u32,
    settle_ticks: u32,
    first_select_pending: bool,
    skip_first_after_mode_switch: bool,
}

impl SelectionState {
    pub fn new(mode: PresentationMode, settle_ticks: u32) -> Self {
        Self {
            mode,
            current: None,
            pending: None,
            settle_remaining: 0,
            settle_ticks: settle_ticks.max(1),
            first_select_pending: false,
            skip_first_after_mode_switch: false,
        }
    }

    /// The front-end finished initializing; the next selection is the first
    pub fn mark_ready(&mut self) {
        self.first_select_pending = true;
    }

    pub fn set_settle_ticks(&mut self, settle_ticks: u32) {
        self.settle_ticks = settle_ticks.max(1);
    }

    pub fn set_mode(&mut self, mode: PresentationMode) {
        if mode == PresentationMode::Fullscreen && self.mode != PresentationMode::Fullscreen {
            self.skip_first_after_mode_switch = true;
        }
        self.mode = mode;
    }

    /// Committed selection
    pub fn current(&self) -> Option<Uuid> {
        self.current
    }

    /// Register a selection event
    ///
    /// Returns `Some(game_id)` when the selection must be applied
    /// immediately (first-selection fast path); otherwise the selection is
    /// parked behind the settle countdown.
    pub fn select(&mut self, game_id: Uuid) -> Option<Uuid> {
        if self.current == Some(game_id) && self.pending.is_none() {
            return None;
        }

        let immediate = match self.mode {
            PresentationMode::Desktop => std::mem::take(&mut self.first_select_pending),
            PresentationMode::Fullscreen => {
                // Only the mode-switch flag grants the skip here
                self.first_select_pending = false;
                std::mem::take(&mut self.skip_first_after_mode_switch)
            }
        };

        if immediate {
            self.pending = None;
            self.settle_remaining = 0;
            Some(game_id)
        } else {
            self.pending = Some(game_id);
            self.settle_remaining = self.settle_ticks;
            None
        }
    }

    /// Advance the settle countdown by one poll tick
    ///
    /// Returns `Some(game_id)` when a parked selection has settled.
    pub fn on_tick(&mut self) -> Option<Uuid> {
        if self.pending.is_none() {
            return None;
        }
        if self.settle_remaining <= 1 {
            self.settle_remaining = 0;
            self.pending.take()
        } else {
            self.settle_remaining -= 1;
            None
        }
    }

    /// Record the applied selection
    pub fn commit(&mut self, game_id: Uuid) {
        self.current = Some(game_id);
    }
}
