//! Settings model and persistence
//!
//! User-editable settings are stored as a TOML file in the platform config
//! directory. Path resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (handled by the CLI layer)
//! 3. Platform config directory
//! 4. Working-directory fallback
//!
//! The two runtime-only flags (`video_is_playing`, `theme_overlay_active`)
//! are excluded from serialization entirely, so a fresh load always starts
//! them at `false` regardless of what a previous session wrote.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name within the config directory
pub const SETTINGS_FILE_NAME: &str = "glmc.toml";

/// Authoritative user-editable settings
///
/// Exactly one instance is current at any time; reloads swap the whole
/// instance atomically through the coordinator's settings cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause music when the launcher window loses focus
    pub pause_on_focus_loss: bool,

    /// Pause music when the launcher window is minimized
    pub pause_on_minimize: bool,

    /// Pause music while the launcher is hidden to the system tray
    pub pause_when_in_tray: bool,

    /// Music volume (0.0-1.0)
    pub music_volume: f64,

    /// Fade-in duration for play/resume transitions (milliseconds)
    pub fade_in_ms: u64,

    /// Fade-out duration for pause transitions (milliseconds)
    pub fade_out_ms: u64,

    /// Media-element poll interval (milliseconds)
    ///
    /// One cooperative clock drives every countdown in the coordinator:
    /// video grace, overlay deadline checks, and selection settle.
    pub media_poll_interval_ms: u64,

    /// Poll ticks a "video stopped" signal must survive before the video
    /// activity flag clears
    pub video_grace_ticks: u32,

    /// Seconds without an overlay refresh before the watchdog force-clears
    /// the overlay flag
    pub overlay_timeout_secs: u64,

    /// Settle delay applied to game selection changes (milliseconds),
    /// absorbing rapid list scrolling
    pub selection_settle_ms: u64,

    /// Runtime-only: a video is currently playing (never persisted)
    #[serde(skip)]
    pub video_is_playing: bool,

    /// Runtime-only: the theme overlay is active (never persisted)
    #[serde(skip)]
    pub theme_overlay_active: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pause_on_focus_loss: true,
            pause_on_minimize: true,
            pause_when_in_tray: true,
            music_volume: 0.5,
            fade_in_ms: 500,
            fade_out_ms: 400,
            media_poll_interval_ms: 500,
            video_grace_ticks: 5,
            overlay_timeout_secs: 60,
            selection_settle_ms: 400,
            video_is_playing: false,
            theme_overlay_active: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// A missing file is not an error: defaults are returned so the
    /// application can run with minimal setup.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut settings: Settings =
            toml::from_str(&raw).map_err(|e| Error::Parse(e.to_string()))?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Save settings to a TOML file, creating parent directories as needed
    ///
    /// Runtime-only flags are skipped by serde and never reach the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = toml::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Selection settle delay expressed in poll ticks (at least one)
    pub fn selection_settle_ticks(&self) -> u32 {
        let poll = self.media_poll_interval_ms.max(1);
        let ticks = self.selection_settle_ms.div_ceil(poll);
        ticks.clamp(1, u32::MAX as u64) as u32
    }
}

/// Resolve the settings file path
///
/// Priority: explicit path > platform config directory > working directory.
pub fn resolve_settings_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("glmc").join(SETTINGS_FILE_NAME);
    }

    PathBuf::from(SETTINGS_FILE_NAME)
}
