//! # GLMC - Game Launcher Music Coordinator
//!
//! Coordinates background-music playback for a game-launcher front-end
//! against a shifting set of interruption signals: window focus loss,
//! minimize, system-tray residency, competing video playback, and an
//! overlay flag driven by a companion video-player component.
//!
//! **Purpose:** Aggregate independent "reasons to pause" into one playback
//! decision and drive the audio engine through fade-timed transitions,
//! staying correct across settings reloads and noisy external events.
//!
//! **Architecture:** Event-driven coordination over tokio. Host adapters
//! feed signals into the [`coordinator::Coordinator`]; a single cooperative
//! poll clock advances the debounce countdowns; decisions reach the audio
//! engine through the [`audio::AudioSink`] trait boundary and observers
//! through the broadcast [`events::EventBus`].

pub mod audio;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod state;

pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use state::{MusicState, SharedState};
