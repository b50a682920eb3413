//! Pause-source coordination engine
//!
//! Decides, at any instant, whether launcher music should be playing,
//! paused, or stopped, given a dynamically changing set of independent
//! reasons to pause. Inputs arrive as host signals (window manager, media
//! elements, theme overlay, settings reloads, game selection); the engine
//! aggregates them and drives the audio sink through play / pause / resume /
//! stop transitions with fade timing.
//!
//! Decision rule, evaluated fresh on every trigger (never incrementally):
//!
//! ```text
//! should_play = sources.is_empty()
//!               && !settings.video_is_playing
//!               && !settings.theme_overlay_active
//! ```
//!
//! A source becoming active pauses, never stop-and-restarts: stopping
//! destroys playback position and causes an audible restart. The engine is
//! edge-triggered - a re-evaluation that does not change the decision
//! issues no sink command - and the most recent decision always wins over
//! any in-flight fade.

mod overlay;
mod selection;
mod settings_sync;
mod sources;
mod video;
mod window;

pub use overlay::OverlayWatchdog;
pub use selection::PresentationMode;
pub use settings_sync::{SettingKey, SettingsSync};
pub use sources::{PauseSource, PauseSourceSet};
pub use video::{GraceState, VideoActivityTracker};

use crate::audio::AudioSink;
use crate::config::Settings;
use crate::error::Result;
use crate::events::GlmcEvent;
use crate::state::{MusicState, SharedState};
use selection::SelectionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Music coordination engine
///
/// All coordination state lives behind this struct; host adapters call its
/// `&self` async methods and the `run` loop drives the cooperative timers.
pub struct Coordinator {
    /// Current-settings cell with change-notification collapsing
    settings: SettingsSync,

    /// Active pause sources
    sources: RwLock<PauseSourceSet>,

    /// Debounced video activity
    video: RwLock<VideoActivityTracker>,

    /// Overlay flag with safety deadline
    overlay: RwLock<OverlayWatchdog>,

    /// Game selection settle state
    selection: RwLock<SelectionState>,

    /// Audio engine boundary
    sink: Arc<dyn AudioSink>,

    /// Shared state (decision, event bus, watchdog counter)
    state: Arc<SharedState>,

    /// Poll loop running flag
    running: RwLock<bool>,
}

impl Coordinator {
    pub fn new(settings: Settings, sink: Arc<dyn AudioSink>, mode: PresentationMode) -> Self {
        let video = VideoActivityTracker::new(settings.video_grace_ticks);
        let overlay = OverlayWatchdog::new(Duration::from_secs(settings.overlay_timeout_secs));
        let selection = SelectionState::new(mode, settings.selection_settle_ticks());

        if let Err(e) = sink.set_volume(settings.music_volume) {
            warn!("Failed to apply initial volume: {}", e);
        }

        Self {
            settings: SettingsSync::new(settings),
            sources: RwLock::new(PauseSourceSet::new()),
            video: RwLock::new(video),
            overlay: RwLock::new(overlay),
            selection: RwLock::new(selection),
            sink,
            state: Arc::new(SharedState::new()),
            running: RwLock::new(false),
        }
    }

    /// Shared state handle for observers
    pub fn shared_state(&self) -> Arc<SharedState> {
        self.state.clone()
    }

    /// Current settings snapshot, valid for one evaluation
    pub async fn current_settings(&self) -> Arc<Settings> {
        self.settings.current().await
    }

    pub(crate) async fn mark_selection_ready(&self) {
        self.selection.write().await.mark_ready();
    }

    /// Subscribe to the coordinator event stream
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<GlmcEvent> {
        self.state.subscribe_events()
    }

    /// One-shot guard for the host's permanent registration hookup
    ///
    /// Returns true on the first call; re-attachment requests are no-ops so
    /// no second handler or timer is ever created.
    pub fn attach(&self) -> bool {
        let first = self.settings.attach();
        if first {
            info!("Coordinator attached to host notifications");
        } else {
            debug!("Attach requested again, ignoring (already attached)");
        }
        first
    }

    /// Main poll loop
    ///
    /// Owns the one cooperative clock every countdown runs on. Started at
    /// most once; a second call is a no-op.
    pub async fn run(&self) -> Result<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                warn!("Coordinator loop already running, ignoring second start");
                return Ok(());
            }
            *running = true;
        }

        let mut poll_ms = self.settings.current().await.media_poll_interval_ms.max(50);
        let mut tick = interval(Duration::from_millis(poll_ms));
        info!("Coordinator loop started (poll interval {} ms)", poll_ms);

        loop {
            tick.tick().await;

            if !*self.running.read().await {
                debug!("Coordinator loop stopping");
                break;
            }

            self.on_poll_tick().await;

            // A settings reload may have changed the poll interval
            let current_ms = self.settings.current().await.media_poll_interval_ms.max(50);
            if current_ms != poll_ms {
                info!("Poll interval changed: {} ms -> {} ms", poll_ms, current_ms);
                poll_ms = current_ms;
                tick = interval(Duration::from_millis(poll_ms));
            }
        }

        info!("Coordinator loop stopped");
        Ok(())
    }

    /// Stop the poll loop
    pub async fn shutdown(&self) {
        *self.running.write().await = false;
    }

    /// One cooperative timer tick
    ///
    /// Advances the video grace countdown, the overlay deadline check, and
    /// the selection settle countdown. Exposed so tests can drive the clock
    /// directly.
    pub async fn on_poll_tick(&self) {
        // Video grace countdown
        let video_cleared = self.video.write().await.on_tick();
        if video_cleared {
            self.settings.update_runtime(|s| s.video_is_playing = false).await;
            self.state.broadcast_event(GlmcEvent::VideoActivityChanged {
                playing: false,
                timestamp: chrono::Utc::now(),
            });
            self.update_sources(|sources| sources.remove(PauseSource::Video)).await;
        }

        // Overlay watchdog deadline
        let tripped = self.overlay.write().await.check(Instant::now());
        if tripped {
            self.settings.update_runtime(|s| s.theme_overlay_active = false).await;
            let trips_total = self.state.increment_watchdog_trips();
            self.state.broadcast_event(GlmcEvent::WatchdogTripped {
                trips_total,
                timestamp: chrono::Utc::now(),
            });
            self.update_sources(|sources| sources.remove(PauseSource::ThemeOverlay)).await;
        }

        // Selection settle countdown
        let settled = self.selection.write().await.on_tick();
        if let Some(game_id) = settled {
            self.apply_selection(game_id).await;
        }
    }

    // ========================================
    // Media element signals
    // ========================================

    /// Raw "video element opened" signal
    pub async fn on_video_started(&self) {
        let changed = self.video.write().await.on_started();
        if changed {
            self.settings.update_runtime(|s| s.video_is_playing = true).await;
            self.state.broadcast_event(GlmcEvent::VideoActivityChanged {
                playing: true,
                timestamp: chrono::Utc::now(),
            });
            self.update_sources(|sources| sources.add(PauseSource::Video)).await;
        }
    }

    /// Raw "video element closed" signal
    ///
    /// Deliberately triggers no evaluation: the flag clears only when the
    /// grace countdown expires without an intervening start.
    pub async fn on_video_stopped(&self) {
        self.video.write().await.on_stopped();
    }

    // ========================================
    // Overlay signals
    // ========================================

    /// Mirror the externally driven overlay flag
    ///
    /// Setting true again re-arms the watchdog deadline without any other
    /// side effect.
    pub async fn set_overlay_active(&self, active: bool) {
        let changed = self.overlay.write().await.set_active(active, Instant::now());
        if changed {
            self.settings.update_runtime(|s| s.theme_overlay_active = active).await;
            self.state.broadcast_event(GlmcEvent::OverlayChanged {
                active,
                timestamp: chrono::Utc::now(),
            });
            self.update_sources(|sources| {
                if active {
                    sources.add(PauseSource::ThemeOverlay)
                } else {
                    sources.remove(PauseSource::ThemeOverlay)
                }
            })
            .await;
        }
    }

    // ========================================
    // User actions
    // ========================================

    /// Explicit user pause/resume
    ///
    /// Manual is one pause source among the set: it participates in the
    /// same aggregation and survives unrelated events (including game
    /// switches) until the user clears it.
    pub async fn set_manual_pause(&self, paused: bool) {
        self.update_sources(|sources| {
            if paused {
                sources.add(PauseSource::Manual)
            } else {
                sources.remove(PauseSource::Manual)
            }
        })
        .await;
    }

    /// Full reset to a default state
    ///
    /// Wipes the window-derived and manual sources; video and overlay
    /// survive because their trackers still hold the live condition.
    pub async fn reset(&self) {
        info!("Coordinator reset requested");
        self.update_sources(|sources| sources.clear_transient()).await;
    }

    /// Game selection event from the front-end
    pub async fn on_game_selected(&self, game_id: Uuid) {
        let immediate = self.selection.write().await.select(game_id);
        match immediate {
            Some(id) => self.apply_selection(id).await,
            None => debug!("Selection {} parked behind settle countdown", game_id),
        }
    }

    /// Presentation mode switch (desktop <-> fullscreen)
    pub async fn on_mode_switched(&self, mode: PresentationMode) {
        info!("Presentation mode switched: {:?}", mode);
        self.selection.write().await.set_mode(mode);
    }

    // ========================================
    // Settings synchronization
    // ========================================

    /// Swap in a freshly loaded settings instance
    ///
    /// Called unconditionally on every reload notification. Runtime flags
    /// are re-derived from live tracker state; knobs held inside component
    /// state are re-applied.
    pub async fn replace_settings(&self, incoming: Settings) {
        let video_active = self.video.read().await.is_playing();
        let overlay_active = self.overlay.read().await.is_active();
        let revision = self.settings.replace(incoming, video_active, overlay_active).await;

        let settings = self.settings.current().await;
        self.video.write().await.set_grace_ticks(settings.video_grace_ticks);
        self.overlay
            .write()
            .await
            .set_timeout(Duration::from_secs(settings.overlay_timeout_secs));
        self.selection
            .write()
            .await
            .set_settle_ticks(settings.selection_settle_ticks());
        if let Err(e) = self.sink.set_volume(settings.music_volume) {
            warn!("Failed to apply volume after settings reload: {}", e);
        }

        info!("Settings replaced (revision {})", revision);
        self.state.broadcast_event(GlmcEvent::SettingsReplaced {
            revision,
            timestamp: chrono::Utc::now(),
        });
        self.evaluate().await;
    }

    /// Single subscription path for settings property changes
    ///
    /// Exactly one re-evaluation per underlying mutation, regardless of how
    /// many listener wirings the host ends up with.
    pub async fn on_setting_changed(&self, key: SettingKey) {
        if !self.settings.note_changed(key) {
            return;
        }

        if key == SettingKey::MusicVolume {
            let volume = self.settings.current().await.music_volume;
            if let Err(e) = self.sink.set_volume(volume) {
                warn!("Failed to apply volume change: {}", e);
            }
        }

        debug!("Setting changed: {:?}, re-evaluating", key);
        self.evaluate().await;
    }

    // ========================================
    // Decision engine
    // ========================================

    /// Mutate the pause-source set and re-evaluate on change
    pub(crate) async fn update_sources<F>(&self, mutate: F)
    where
        F: FnOnce(&mut PauseSourceSet) -> bool,
    {
        let (changed, snapshot) = {
            let mut sources = self.sources.write().await;
            let changed = mutate(&mut sources);
            (changed, sources.snapshot())
        };

        if changed {
            self.state.broadcast_event(GlmcEvent::PauseSourcesChanged {
                sources: snapshot,
                timestamp: chrono::Utc::now(),
            });
            self.evaluate().await;
        }
    }

    /// Re-evaluate the decision rule and apply the outcome
    ///
    /// Evaluated fresh each time; edge-triggered against the last emitted
    /// decision. Any sink failure degrades to pause - failing safe beats
    /// blasting two audio streams at once.
    pub(crate) async fn evaluate(&self) {
        let settings = self.settings.current().await;
        let should_play = {
            let sources = self.sources.read().await;
            sources.is_empty() && !settings.video_is_playing && !settings.theme_overlay_active
        };
        let current = self.state.music_state().await;
        let has_selection = self.selection.read().await.current().is_some();

        let fade_in = Duration::from_millis(settings.fade_in_ms);
        let fade_out = Duration::from_millis(settings.fade_out_ms);

        let outcome = match (should_play, current) {
            (true, MusicState::Paused) => {
                debug!("Decision: resume (no active pause demands)");
                self.resume_music(fade_in).await
            }
            (true, MusicState::Stopped) if has_selection => {
                debug!("Decision: play selection");
                self.start_music(fade_in).await
            }
            (false, MusicState::Playing) => {
                debug!("Decision: pause");
                self.pause_music(fade_out).await
            }
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            warn!("Audio transition failed: {}; degrading to pause", e);
            let _ = self.sink.pause(Duration::ZERO);
            self.set_music_state(MusicState::Paused).await;
        }
    }

    async fn start_music(&self, fade_in: Duration) -> Result<()> {
        self.sink.play(fade_in)?;
        self.set_music_state(MusicState::Playing).await;
        Ok(())
    }

    async fn resume_music(&self, fade_in: Duration) -> Result<()> {
        self.sink.resume(fade_in)?;
        self.set_music_state(MusicState::Playing).await;
        Ok(())
    }

    async fn pause_music(&self, fade_out: Duration) -> Result<()> {
        self.sink.pause(fade_out)?;
        self.set_music_state(MusicState::Paused).await;
        Ok(())
    }

    /// Commit a settled selection and restart playback for it
    ///
    /// A new selection replaces the old track outright, so stop (not pause)
    /// is correct here; pause demands and manual pause survive untouched
    /// and keep the new track from starting until they clear.
    async fn apply_selection(&self, game_id: Uuid) {
        self.selection.write().await.commit(game_id);

        if self.state.music_state().await != MusicState::Stopped {
            if let Err(e) = self.sink.stop() {
                warn!("Failed to stop previous track: {}", e);
            }
            self.set_music_state(MusicState::Stopped).await;
        }

        self.state.broadcast_event(GlmcEvent::SelectionChanged {
            game_id,
            timestamp: chrono::Utc::now(),
        });
        self.evaluate().await;
    }

    /// Record a decision change and broadcast it
    async fn set_music_state(&self, new_state: MusicState) {
        let old_state = self.state.swap_music_state(new_state).await;
        if old_state != new_state {
            info!("Music state changed: {} -> {}", old_state, new_state);
            self.state.broadcast_event(GlmcEvent::MusicStateChanged {
                old_state,
                new_state,
                timestamp: chrono::Utc::now(),
            });
        }
    }
}
