//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::watcher::WatchTarget;

/// How the log file is re-read after a change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Replay the whole file on every change.
    #[default]
    Full,
    /// Fold only appended lines, replaying on truncation or date change.
    Incremental,
}

/// Settings loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Wurm Online install directory.
    pub install_dir: Option<PathBuf>,
    /// Character to monitor.
    pub player_name: Option<String>,
    /// `YYYY-MM` log month; the current month when unset.
    pub log_month: Option<String>,
    pub scan_mode: ScanMode,
    /// Debounce window for file events, in milliseconds.
    pub debounce_ms: u64,
    /// Countdown refresh interval, in milliseconds.
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_dir: None,
            player_name: None,
            log_month: None,
            scan_mode: ScanMode::default(),
            debounce_ms: 100,
            tick_ms: 1000,
        }
    }
}

impl Settings {
    /// The watch target, if both install dir and player are set.
    #[must_use]
    pub fn target(&self) -> Option<WatchTarget> {
        let install_dir = self.install_dir.clone()?;
        let player_name = self.player_name.clone().filter(|p| !p.is_empty())?;
        Some(WatchTarget::new(install_dir, player_name))
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Countdown refresh interval, never shorter than 10 ms.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}
