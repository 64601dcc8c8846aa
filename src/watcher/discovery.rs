//! Log path discovery utilities.
//!
//! Provides functions to locate Wurm Online characters and their event
//! logs under a game install directory.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::WatcherError;

/// The character whose event log is monitored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchTarget {
    /// Wurm Online install directory.
    pub install_dir: PathBuf,
    /// Character directory name under `players/`.
    pub player_name: String,
}

impl WatchTarget {
    #[must_use]
    pub fn new(install_dir: impl Into<PathBuf>, player_name: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            player_name: player_name.into(),
        }
    }

    /// Logs folder of this character.
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        players_dir(&self.install_dir)
            .join(&self.player_name)
            .join("logs")
    }

    /// Event log path for the given `YYYY-MM` month.
    #[must_use]
    pub fn log_file_path(&self, year_month: &str) -> PathBuf {
        self.logs_dir().join(event_log_file_name(year_month))
    }
}

/// Players directory of an install.
#[must_use]
pub fn players_dir(install_dir: &Path) -> PathBuf {
    install_dir.join("players")
}

/// File name of the event log for a `YYYY-MM` month.
///
/// # Examples
///
/// ```
/// use wurm_timer::watcher::event_log_file_name;
///
/// assert_eq!(event_log_file_name("2026-03"), "_Event.2026-03.txt");
/// ```
#[must_use]
pub fn event_log_file_name(year_month: &str) -> String {
    format!("_Event.{year_month}.txt")
}

/// Format a date as the `YYYY-MM` month used in log file names.
#[must_use]
pub fn year_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// The `YYYY-MM` month of the current local date.
#[must_use]
pub fn current_year_month() -> String {
    year_month(chrono::Local::now().date_naive())
}

/// List character names found under `<install_dir>/players`, sorted.
///
/// # Errors
///
/// Returns `WatcherError::PlayersDirNotFound` if the players directory
/// does not exist, or an I/O error if it cannot be read.
pub fn list_players(install_dir: &Path) -> Result<Vec<String>, WatcherError> {
    let dir = players_dir(install_dir);
    if !dir.is_dir() {
        return Err(WatcherError::PlayersDirNotFound(dir));
    }

    let mut players: Vec<String> = std::fs::read_dir(&dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .collect();
    players.sort();

    tracing::debug!(dir = %dir.display(), count = players.len(), "Listed players");
    Ok(players)
}

/// Locate the logs folder of a character.
///
/// # Errors
///
/// Returns `WatcherError::LogsDirNotFound` if the folder does not exist.
pub fn locate_logs_dir(target: &WatchTarget) -> Result<PathBuf, WatcherError> {
    let logs_dir = target.logs_dir();
    if logs_dir.is_dir() {
        Ok(logs_dir)
    } else {
        Err(WatcherError::LogsDirNotFound(logs_dir))
    }
}
