//! Watcher module for Wurm Online event logs.
//!
//! Locates the event log, watches it for changes, and scans it into
//! derived state.

mod discovery;
mod error;
mod file_watcher;
mod scanner;
mod tailer;

pub use discovery::{
    current_year_month, event_log_file_name, list_players, locate_logs_dir, players_dir,
    year_month, WatchTarget,
};
pub use error::WatcherError;
pub use file_watcher::{LogFileWatcher, DEFAULT_DEBOUNCE};
pub use scanner::LogScanner;
pub use tailer::LogTailer;
