//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur while locating, watching, or reading a log file.
#[derive(thiserror::Error, Debug)]
pub enum WatcherError {
    /// Watched log file does not exist (yet).
    #[error("Log file not found: {0}")]
    MissingFile(PathBuf),

    /// Permission denied accessing file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The OS watch could not be registered.
    #[error("Failed to watch {path}: {source}")]
    SetupFailed {
        path: PathBuf,
        #[source]
        source: notify_debouncer_full::notify::Error,
    },

    /// The players directory of an install is missing.
    #[error("Players directory not found: {0}")]
    PlayersDirNotFound(PathBuf),

    /// The logs folder of a character is missing.
    #[error("Logs folder not found: {0}")]
    LogsDirNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// Classify an I/O error raised while opening `path`.
    pub(crate) fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::MissingFile(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}
