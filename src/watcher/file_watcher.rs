//! Log file watcher with notify integration.
//!
//! Watches the parent directory of a single log file and signals a
//! re-scan whenever that exact file changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use tokio::sync::mpsc;

use super::error::WatcherError;

/// Default debounce window for file system events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches exactly one log file for changes.
///
/// The file itself may not exist yet; its parent directory must. Each
/// relevant change sends a unit trigger on a capacity-one channel, so
/// bursts of changes collapse into a single pending re-scan.
pub struct LogFileWatcher {
    /// The log file being watched.
    path: PathBuf,
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl LogFileWatcher {
    /// Start watching `path`.
    ///
    /// Returns the watcher and a receiver for change triggers.
    ///
    /// # Errors
    ///
    /// Returns `WatcherError::SetupFailed` if the parent directory is
    /// missing or the OS watch cannot be registered.
    pub fn start(
        path: PathBuf,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<()>), WatcherError> {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let dir = std::fs::canonicalize(dir).map_err(|e| WatcherError::SetupFailed {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let target = match path.file_name() {
            Some(name) => dir.join(name),
            None => path.clone(),
        };

        let filter_target = target.clone();
        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            Self::handle_debounce_result(result, &filter_target, &trigger_tx);
        })
        .map_err(|source| WatcherError::SetupFailed {
            path: dir.clone(),
            source,
        })?;

        debouncer
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatcherError::SetupFailed {
                path: dir.clone(),
                source,
            })?;

        tracing::info!(path = %target.display(), "Watching log file");

        Ok((
            Self {
                path: target,
                debouncer,
            },
            trigger_rx,
        ))
    }

    /// Handle a debounce result from notify.
    fn handle_debounce_result(
        result: DebounceEventResult,
        target: &Path,
        trigger_tx: &mpsc::Sender<()>,
    ) {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|event| {
                    !matches!(event.kind, EventKind::Access(_))
                        && event.paths.iter().any(|p| p == target)
                });
                if relevant {
                    // A full channel already holds a pending trigger.
                    let _ = trigger_tx.try_send(());
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::warn!(path = %target.display(), error = %error, "File watcher error");
                }
            }
        }
    }

    /// Get the resolved path being watched.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop watching, waiting for the notify thread to exit.
    pub fn stop(self) {
        tracing::info!(path = %self.path.display(), "Stopped watching log file");
        self.debouncer.stop();
    }
}

impl std::fmt::Debug for LogFileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFileWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
