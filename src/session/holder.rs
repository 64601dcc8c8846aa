//! Single-writer holder for the published snapshot.
//!
//! Scan loops and the session controller send [`StateMessage`]s; only the
//! holder task writes the `watch` channel readers poll.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::state::{DerivedState, Snapshot};

/// Default capacity for the state message channel.
pub const DEFAULT_STATE_CHANNEL_CAPACITY: usize = 32;

/// Messages accepted by the [`StateHolder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMessage {
    /// A new log file (or none) was selected under a new generation.
    Retarget {
        generation: u64,
        log_path: Option<PathBuf>,
    },
    /// A scan finished.
    Scanned {
        generation: u64,
        log_path: PathBuf,
        state: DerivedState,
    },
}

/// Owns the snapshot channel and applies state messages in arrival order.
#[derive(Debug)]
pub struct StateHolder {
    rx: mpsc::Receiver<StateMessage>,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl StateHolder {
    /// Create a holder with its message sender and snapshot receiver.
    #[must_use]
    pub fn new() -> (
        Self,
        mpsc::Sender<StateMessage>,
        watch::Receiver<Arc<Snapshot>>,
    ) {
        let (msg_tx, msg_rx) = mpsc::channel(DEFAULT_STATE_CHANNEL_CAPACITY);
        let (snap_tx, snap_rx) = watch::channel(Arc::new(Snapshot::default()));
        (
            Self {
                rx: msg_rx,
                tx: snap_tx,
            },
            msg_tx,
            snap_rx,
        )
    }

    /// Apply messages until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            self.apply(message);
        }
        tracing::debug!("State holder stopped");
    }

    /// Apply one message, returning whether a new snapshot was published.
    pub fn apply(&mut self, message: StateMessage) -> bool {
        match message {
            StateMessage::Retarget {
                generation,
                log_path,
            } => self.tx.send_if_modified(|current| {
                if generation <= current.generation {
                    tracing::warn!(
                        generation,
                        current = current.generation,
                        "Ignoring stale retarget"
                    );
                    return false;
                }
                *current = Arc::new(Snapshot::empty(generation, log_path));
                true
            }),
            StateMessage::Scanned {
                generation,
                log_path,
                state,
            } => self.tx.send_if_modified(|current| {
                if generation != current.generation {
                    tracing::debug!(
                        generation,
                        current = current.generation,
                        path = %log_path.display(),
                        "Discarding scan for previous log file"
                    );
                    return false;
                }
                if current.state == state {
                    return false;
                }
                tracing::debug!(generation, state = ?state, "Publishing snapshot");
                *current = Arc::new(Snapshot {
                    generation,
                    log_path: Some(log_path),
                    state,
                });
                true
            }),
        }
    }
}
