//! Shared test infrastructure
//!
//! A recording sink standing in for the audio engine, plus builders for
//! coordinators in commonly needed starting states.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use glmc::audio::AudioSink;
use glmc::config::Settings;
use glmc::coordinator::{Coordinator, PresentationMode};
use glmc::error::{Error, Result};
use uuid::Uuid;

/// One audio engine command as observed by the recording sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    Play(Duration),
    Pause(Duration),
    Resume(Duration),
    Stop,
    SetVolume(f64),
}

/// Sink that records every command for later inspection
#[derive(Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<SinkCommand>>>,
    fail_playback: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far
    pub fn commands(&self) -> Vec<SinkCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Forget recorded commands (for setup phases)
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }

    /// Count commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&SinkCommand) -> bool) -> usize {
        self.commands.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Make play/resume fail until cleared, to exercise the fail-safe path
    pub fn set_fail_playback(&self, fail: bool) {
        self.fail_playback.store(fail, Ordering::SeqCst);
    }
}

impl AudioSink for RecordingSink {
    fn play(&self, fade_in: Duration) -> Result<()> {
        if self.fail_playback.load(Ordering::SeqCst) {
            return Err(Error::Sink("injected playback failure".to_string()));
        }
        self.commands.lock().unwrap().push(SinkCommand::Play(fade_in));
        Ok(())
    }

    fn pause(&self, fade_out: Duration) -> Result<()> {
        self.commands.lock().unwrap().push(SinkCommand::Pause(fade_out));
        Ok(())
    }

    fn resume(&self, fade_in: Duration) -> Result<()> {
        if self.fail_playback.load(Ordering::SeqCst) {
            return Err(Error::Sink("injected playback failure".to_string()));
        }
        self.commands.lock().unwrap().push(SinkCommand::Resume(fade_in));
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.commands.lock().unwrap().push(SinkCommand::Stop);
        Ok(())
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        self.commands.lock().unwrap().push(SinkCommand::SetVolume(volume));
        Ok(())
    }
}

/// Coordinator wired to a recording sink
pub fn build_coordinator(settings: Settings, mode: PresentationMode) -> (Arc<Coordinator>, RecordingSink) {
    let sink = RecordingSink::new();
    let coordinator = Arc::new(Coordinator::new(settings, Arc::new(sink.clone()), mode));
    (coordinator, sink)
}

/// Coordinator that is ready, has a selection, and is playing
///
/// Uses the desktop first-selection fast path so no settle ticks are needed.
pub async fn playing_coordinator(settings: Settings) -> (Arc<Coordinator>, RecordingSink, Uuid) {
    let (coordinator, sink) = build_coordinator(settings, PresentationMode::Desktop);
    coordinator.on_frontend_ready(true).await;

    let game_id = Uuid::new_v4();
    coordinator.on_game_selected(game_id).await;
    assert_eq!(coordinator.shared_state().music_state().await, glmc::MusicState::Playing);

    sink.clear();
    (coordinator, sink, game_id)
}
