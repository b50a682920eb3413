//! Window event adapters
//!
//! Translate raw window-manager signals into pause-source mutations. The
//! add side of each pair is gated by its settings toggle; the remove side
//! is always unconditional. A setting may prevent a pause from starting,
//! but it must never prevent an active pause from being released once its
//! triggering condition ends - gating removal leaves playback stuck paused
//! forever when the toggle is disabled mid-pause.

use super::{Coordinator, PauseSource};
use tracing::debug;

impl Coordinator {
    /// Application deactivated (window lost focus)
    pub async fn on_window_deactivated(&self) {
        if self.current_settings().await.pause_on_focus_loss {
            self.update_sources(|sources| sources.add(PauseSource::FocusLoss)).await;
        } else {
            debug!("Focus loss ignored (pause_on_focus_loss disabled)");
        }
    }

    /// Application activated (window regained focus)
    pub async fn on_window_activated(&self) {
        self.update_sources(|sources| sources.remove(PauseSource::FocusLoss)).await;
    }

    /// Window minimized
    pub async fn on_window_minimized(&self) {
        if self.current_settings().await.pause_on_minimize {
            self.update_sources(|sources| sources.add(PauseSource::Minimized)).await;
        } else {
            debug!("Minimize ignored (pause_on_minimize disabled)");
        }
    }

    /// Window restored from minimized
    pub async fn on_window_restored(&self) {
        self.update_sources(|sources| sources.remove(PauseSource::Minimized)).await;
    }

    /// Window hidden to the system tray
    pub async fn on_window_hidden_to_tray(&self) {
        if self.current_settings().await.pause_when_in_tray {
            self.update_sources(|sources| sources.add(PauseSource::SystemTray)).await;
        } else {
            debug!("Hide-to-tray ignored (pause_when_in_tray disabled)");
        }
    }

    /// Window shown from the system tray
    pub async fn on_window_shown_from_tray(&self) {
        self.update_sources(|sources| sources.remove(PauseSource::SystemTray)).await;
    }

    /// The front-end window reached a stable, fully initialized state
    ///
    /// Initial focus is evaluated only here, never from the transient
    /// not-yet-settled startup window state - pre-seeding focus loss from
    /// that state leaves playback paused forever on launch.
    pub async fn on_frontend_ready(&self, focused: bool) {
        self.mark_selection_ready().await;

        if !focused && self.current_settings().await.pause_on_focus_loss {
            debug!("Front-end ready without focus, seeding focus-loss source");
            self.update_sources(|sources| sources.add(PauseSource::FocusLoss)).await;
        }
    }
}
