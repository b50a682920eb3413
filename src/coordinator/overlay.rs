//! Overlay flag watchdog
//!
//! Mirrors the externally driven "theme overlay active" flag. The driver is
//! outside this process and can stop emitting signals (a UI under test, a
//! misbehaving theme integration), which would leave music paused forever.
//! A safety deadline force-clears the flag if no corroborating refresh
//! arrives; the primary clearing path remains an explicit
//! `set_active(false)` from the driver.

use tokio::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug)]
pub struct OverlayWatchdog {
    active: bool,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl OverlayWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            active: false,
            deadline: None,
            timeout,
        }
    }

    /// Mirror the external flag
    ///
    /// Setting true (re)arms the safety deadline, also when the flag was
    /// already active - every refresh buys the driver another timeout
    /// window. Setting false disarms it. Returns true if the flag changed.
    pub fn set_active(&mut self, active: bool, now: Instant) -> bool {
        let changed = self.active != active;
        self.active = active;
        self.deadline = if active { Some(now + self.timeout) } else { None };
        changed
    }

    /// Deadline check, called once per poll tick
    ///
    /// On expiry with no intervening refresh the flag is force-cleared and
    /// true is returned so the caller can emit a diagnostic signal.
    pub fn check(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if self.active && now >= deadline => {
                warn!(
                    "Overlay flag stuck for {} s without refresh, force-clearing",
                    self.timeout.as_secs()
                );
                self.active = false;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Applied on settings reload; affects future arms only
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
