//! Decision engine integration tests
//!
//! Exercises the pause-source aggregation end to end through the public
//! adapter surface, observing the commands that reach the audio sink.

mod helpers;

use glmc::config::Settings;
use glmc::coordinator::PresentationMode;
use glmc::MusicState;
use helpers::{build_coordinator, playing_coordinator, SinkCommand};
use std::time::Duration;

#[tokio::test]
async fn focus_loss_pauses_and_release_resumes_exactly_once() {
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_window_deactivated().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Paused);
    assert_eq!(
        sink.commands(),
        vec![SinkCommand::Pause(Duration::from_millis(400))]
    );

    coordinator.on_window_activated().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
    assert_eq!(
        sink.count(|c| matches!(c, SinkCommand::Resume(_))),
        1,
        "fade-in must be issued exactly once"
    );

    // Releasing again changes nothing
    coordinator.on_window_activated().await;
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Resume(_))), 1);
}

#[tokio::test]
async fn disabled_setting_still_releases_active_source() {
    // Minimize while the toggle is on, then disable the toggle and restore:
    // the source must clear regardless of the new setting value.
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_window_minimized().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Paused);

    let mut updated = Settings::default();
    updated.pause_on_minimize = false;
    coordinator.replace_settings(updated).await;
    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Paused,
        "replacing settings alone must not release the active source"
    );

    coordinator.on_window_restored().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Resume(_))), 1);
}

#[tokio::test]
async fn disabled_setting_prevents_new_pause() {
    let mut settings = Settings::default();
    settings.pause_on_minimize = false;
    let (coordinator, sink, _game) = playing_coordinator(settings).await;

    coordinator.on_window_minimized().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
    assert!(sink.commands().is_empty());
}

#[tokio::test]
async fn video_maps_to_pause_never_stop() {
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_video_started().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Paused);

    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Pause(_))), 1);
    assert_eq!(
        sink.count(|c| matches!(c, SinkCommand::Stop)),
        0,
        "competing video must pause, never stop"
    );
}

#[tokio::test]
async fn manual_pause_survives_game_switch() {
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.set_manual_pause(true).await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Paused);

    // Switch games; the settle countdown runs on poll ticks
    let next_game = uuid::Uuid::new_v4();
    coordinator.on_game_selected(next_game).await;
    for _ in 0..10 {
        coordinator.on_poll_tick().await;
    }

    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Stopped,
        "manual pause keeps the new selection from starting"
    );
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Play(_))), 0);

    coordinator.set_manual_pause(false).await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Play(_))), 1);
}

#[tokio::test]
async fn reset_preserves_video_and_overlay_sources() {
    let (coordinator, _sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_video_started().await;
    coordinator.set_manual_pause(true).await;
    coordinator.on_window_deactivated().await;

    coordinator.reset().await;
    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Paused,
        "reset must not restart music under a playing video"
    );

    // Video ends; grace runs out; now nothing demands pause
    coordinator.on_video_stopped().await;
    for _ in 0..5 {
        coordinator.on_poll_tick().await;
    }
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
}

#[tokio::test]
async fn startup_without_focus_seeds_focus_loss_only_when_ready() {
    let (coordinator, sink) = build_coordinator(Settings::default(), PresentationMode::Desktop);

    // Window not yet settled: nothing is seeded, nothing plays
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Stopped);

    coordinator.on_frontend_ready(false).await;
    let game = uuid::Uuid::new_v4();
    coordinator.on_game_selected(game).await;

    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Stopped,
        "unfocused launch must not start playback"
    );
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Play(_))), 0);

    // Focus arrives: the seeded source releases and playback starts
    coordinator.on_window_activated().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
}

#[tokio::test]
async fn tray_adapter_follows_gating_asymmetry() {
    let (coordinator, _sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_window_hidden_to_tray().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Paused);

    let mut updated = Settings::default();
    updated.pause_when_in_tray = false;
    coordinator.replace_settings(updated).await;

    coordinator.on_window_shown_from_tray().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
}

#[tokio::test]
async fn overlapping_sources_release_independently() {
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_window_deactivated().await;
    coordinator.on_window_minimized().await;
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Pause(_))), 1);

    coordinator.on_window_activated().await;
    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Paused,
        "one remaining source still demands pause"
    );

    coordinator.on_window_restored().await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
}

#[tokio::test]
async fn playback_failure_degrades_to_pause() {
    let (coordinator, sink, _game) = playing_coordinator(Settings::default()).await;

    coordinator.on_window_deactivated().await;
    sink.set_fail_playback(true);
    coordinator.on_window_activated().await;

    assert_eq!(
        coordinator.shared_state().music_state().await,
        MusicState::Paused,
        "a failed transition must fail safe to paused"
    );
}

#[tokio::test]
async fn fullscreen_first_selection_skip_applies_once() {
    let (coordinator, sink) = build_coordinator(Settings::default(), PresentationMode::Desktop);
    coordinator.on_frontend_ready(true).await;
    coordinator.on_mode_switched(PresentationMode::Fullscreen).await;
    sink.clear();

    // Mode-switch flag grants one immediate selection
    coordinator.on_game_selected(uuid::Uuid::new_v4()).await;
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Play(_))), 1);

    // The next selection must go through the settle countdown
    coordinator.on_game_selected(uuid::Uuid::new_v4()).await;
    assert_eq!(
        sink.count(|c| matches!(c, SinkCommand::Stop)),
        0,
        "second selection must not apply immediately"
    );
    for _ in 0..5 {
        coordinator.on_poll_tick().await;
    }
    assert_eq!(sink.count(|c| matches!(c, SinkCommand::Stop)), 1);
    assert_eq!(coordinator.shared_state().music_state().await, MusicState::Playing);
}
