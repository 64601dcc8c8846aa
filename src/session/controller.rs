//! Monitoring session controller.
//!
//! Owns the selected character, the active file watcher, and the scan loop
//! feeding the [`StateHolder`]. Selecting a new character stops the
//! previous watch before the next one starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::holder::{StateHolder, StateMessage};
use crate::config::{ScanMode, Settings};
use crate::parser::ParseError;
use crate::projector::Clock;
use crate::state::{DerivedState, Snapshot};
use crate::watcher::{
    current_year_month, LogFileWatcher, LogScanner, LogTailer, WatchTarget, WatcherError,
    DEFAULT_DEBOUNCE,
};

/// Error type for session operations.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// Watching the log file failed.
    #[error(transparent)]
    Watcher(#[from] WatcherError),
    /// Log patterns failed to compile.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The state holder task has stopped.
    #[error("State holder stopped")]
    HolderClosed,
}

/// Options controlling how a session watches and scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub scan_mode: ScanMode,
    pub debounce: Duration,
    /// Fixed `YYYY-MM` log month; the current month when `None`.
    pub log_month: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            scan_mode: ScanMode::Full,
            debounce: DEFAULT_DEBOUNCE,
            log_month: None,
        }
    }
}

impl From<&Settings> for SessionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            scan_mode: settings.scan_mode,
            debounce: settings.debounce(),
            log_month: settings.log_month.clone(),
        }
    }
}

/// Full or incremental re-read of the log file.
enum ScanStrategy {
    Full(LogScanner),
    Incremental(Box<LogTailer>),
}

impl ScanStrategy {
    fn new(mode: ScanMode, scanner: LogScanner, path: &Path) -> Self {
        match mode {
            ScanMode::Full => Self::Full(scanner),
            ScanMode::Incremental => {
                Self::Incremental(Box::new(LogTailer::new(path.to_path_buf(), scanner)))
            }
        }
    }

    async fn scan(&mut self, path: &Path, clock: &dyn Clock) -> DerivedState {
        match self {
            Self::Full(scanner) => scanner.rescan(path, clock.today()).await,
            Self::Incremental(tailer) => tailer.read_state(clock.today()).await,
        }
    }
}

/// The currently running watch.
struct ActiveWatch {
    target: WatchTarget,
    log_path: PathBuf,
    watcher: LogFileWatcher,
    cancel: CancellationToken,
    scan_task: JoinHandle<()>,
}

/// Controller for monitoring one character's event log at a time.
///
/// Must be created inside a tokio runtime.
pub struct MonitorSession {
    scanner: LogScanner,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
    state_tx: mpsc::Sender<StateMessage>,
    snapshots: watch::Receiver<Arc<Snapshot>>,
    holder: JoinHandle<()>,
    active: Option<ActiveWatch>,
    generation: u64,
}

impl MonitorSession {
    /// Create an idle session and spawn its state holder.
    ///
    /// # Errors
    ///
    /// Returns an error if the log patterns fail to compile.
    pub fn new(options: SessionOptions, clock: Arc<dyn Clock>) -> Result<Self, SessionError> {
        let (holder, state_tx, snapshots) = StateHolder::new();
        let holder = tokio::spawn(holder.run());

        Ok(Self {
            scanner: LogScanner::new()?,
            clock,
            options,
            state_tx,
            snapshots,
            holder,
            active: None,
            generation: 0,
        })
    }

    /// Subscribe to published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// The currently selected character, if monitoring.
    #[must_use]
    pub fn target(&self) -> Option<&WatchTarget> {
        self.active.as_ref().map(|a| &a.target)
    }

    /// The log file being monitored, if any.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.log_path.as_path())
    }

    /// Current watch generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolve the event log path of `target` for the configured month.
    #[must_use]
    pub fn resolve_log_path(&self, target: &WatchTarget) -> PathBuf {
        let month = self
            .options
            .log_month
            .clone()
            .unwrap_or_else(current_year_month);
        target.log_file_path(&month)
    }

    /// Start monitoring `target`, replacing any previous watch.
    ///
    /// The previous watcher is fully stopped first. The new log file is
    /// scanned immediately, then again after each change.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Watcher` if the watch cannot be registered.
    /// Monitoring is then stopped and an empty snapshot without a log path
    /// is published.
    pub async fn select(&mut self, target: WatchTarget) -> Result<(), SessionError> {
        self.halt_active().await;

        let log_path = self.resolve_log_path(&target);
        let generation = self.next_generation();

        let (watcher, triggers) =
            match LogFileWatcher::start(log_path.clone(), self.options.debounce) {
                Ok(started) => started,
                Err(e) => {
                    self.send(StateMessage::Retarget {
                        generation,
                        log_path: None,
                    })
                    .await?;
                    return Err(e.into());
                }
            };

        if let Err(e) = self
            .send(StateMessage::Retarget {
                generation,
                log_path: Some(log_path.clone()),
            })
            .await
        {
            stop_watcher(watcher).await;
            return Err(e);
        }

        let cancel = CancellationToken::new();
        let strategy = ScanStrategy::new(self.options.scan_mode, self.scanner.clone(), &log_path);
        let scan_task = tokio::spawn(run_scan_loop(
            generation,
            log_path.clone(),
            triggers,
            strategy,
            self.state_tx.clone(),
            Arc::clone(&self.clock),
            cancel.clone(),
        ));

        tracing::info!(
            player = %target.player_name,
            path = %log_path.display(),
            generation,
            "Monitoring started"
        );

        self.active = Some(ActiveWatch {
            target,
            log_path,
            watcher,
            cancel,
            scan_task,
        });
        Ok(())
    }

    /// Stop monitoring and publish an empty state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HolderClosed` if the state holder has stopped.
    pub async fn stop(&mut self) -> Result<(), SessionError> {
        self.halt_active().await;
        let generation = self.next_generation();
        self.send(StateMessage::Retarget {
            generation,
            log_path: None,
        })
        .await
    }

    /// Re-scan the monitored log file now, outside the watcher.
    ///
    /// Does nothing when not monitoring.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HolderClosed` if the state holder has stopped.
    pub async fn rescan_now(&self) -> Result<(), SessionError> {
        let Some(active) = &self.active else {
            return Ok(());
        };
        let state = self
            .scanner
            .rescan(&active.log_path, self.clock.today())
            .await;
        self.send(StateMessage::Scanned {
            generation: self.generation,
            log_path: active.log_path.clone(),
            state,
        })
        .await
    }

    /// Stop monitoring and wait for the state holder to finish.
    pub async fn shutdown(mut self) {
        self.halt_active().await;
        let Self {
            state_tx, holder, ..
        } = self;
        drop(state_tx);
        if let Err(e) = holder.await {
            tracing::warn!(error = %e, "State holder task failed");
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    async fn send(&self, message: StateMessage) -> Result<(), SessionError> {
        self.state_tx
            .send(message)
            .await
            .map_err(|_| SessionError::HolderClosed)
    }

    /// Stop the active watcher and scan loop, if any.
    async fn halt_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        active.cancel.cancel();
        stop_watcher(active.watcher).await;
        if let Err(e) = active.scan_task.await {
            tracing::warn!(error = %e, "Scan loop task failed");
        }

        tracing::info!(
            player = %active.target.player_name,
            path = %active.log_path.display(),
            "Monitoring stopped"
        );
    }
}

impl std::fmt::Debug for MonitorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSession")
            .field("options", &self.options)
            .field("generation", &self.generation)
            .field("log_path", &self.log_path())
            .finish_non_exhaustive()
    }
}

/// Stop a watcher off the runtime, since it joins the notify thread.
async fn stop_watcher(watcher: LogFileWatcher) {
    if let Err(e) = tokio::task::spawn_blocking(move || watcher.stop()).await {
        tracing::warn!(error = %e, "Failed to stop file watcher");
    }
}

/// Scan once, then again after each change trigger, until cancelled.
async fn run_scan_loop(
    generation: u64,
    log_path: PathBuf,
    mut triggers: mpsc::Receiver<()>,
    mut strategy: ScanStrategy,
    state_tx: mpsc::Sender<StateMessage>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
) {
    loop {
        let state = strategy.scan(&log_path, clock.as_ref()).await;
        let message = StateMessage::Scanned {
            generation,
            log_path: log_path.clone(),
            state,
        };
        if state_tx.send(message).await.is_err() {
            break;
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            trigger = triggers.recv() => {
                if trigger.is_none() {
                    break;
                }
            }
        }
    }
    tracing::debug!(generation, path = %log_path.display(), "Scan loop stopped");
}
