//! Audio engine boundary
//!
//! The coordinator owns no decoding or mixing logic; it drives an engine
//! that lives behind the `AudioSink` trait. Commands are non-blocking and
//! the engine performs fades on its own thread.

use crate::error::Result;
use std::time::Duration;
use tracing::info;

/// Command surface of the audio engine
///
/// Contract: a new command always supersedes any in-flight volume ramp.
/// The coordinator relies on this to honor its most-recent-decision-wins
/// rule without queueing transitions.
pub trait AudioSink: Send + Sync {
    /// Start playback of the current selection with a fade-in ramp
    fn play(&self, fade_in: Duration) -> Result<()>;

    /// Pause playback with a fade-out ramp, keeping position
    fn pause(&self, fade_out: Duration) -> Result<()>;

    /// Resume paused playback with a fade-in ramp
    fn resume(&self, fade_in: Duration) -> Result<()>;

    /// Stop playback outright, discarding position
    fn stop(&self) -> Result<()>;

    /// Set master volume (0.0-1.0)
    fn set_volume(&self, volume: f64) -> Result<()>;
}

/// Sink that logs commands without producing audio
///
/// Used by the harness binary and anywhere a real engine is not wired up.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, fade_in: Duration) -> Result<()> {
        info!("sink: play (fade-in {} ms)", fade_in.as_millis());
        Ok(())
    }

    fn pause(&self, fade_out: Duration) -> Result<()> {
        info!("sink: pause (fade-out {} ms)", fade_out.as_millis());
        Ok(())
    }

    fn resume(&self, fade_in: Duration) -> Result<()> {
        info!("sink: resume (fade-in {} ms)", fade_in.as_millis());
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        info!("sink: stop");
        Ok(())
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        info!("sink: volume {:.2}", volume.clamp(0.0, 1.0));
        Ok(())
    }
}
