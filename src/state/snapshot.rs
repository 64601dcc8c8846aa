//! Published snapshots of derived state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::DerivedState;

/// An immutable, fully-formed derived state published to readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Watch generation that produced this snapshot.
    pub generation: u64,
    /// Log file the state was derived from, if any is selected.
    pub log_path: Option<PathBuf>,
    pub state: DerivedState,
}

impl Snapshot {
    /// Empty snapshot for a newly selected log file.
    #[must_use]
    pub fn empty(generation: u64, log_path: Option<PathBuf>) -> Self {
        Self {
            generation,
            log_path,
            state: DerivedState::default(),
        }
    }
}
