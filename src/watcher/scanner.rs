//! Whole-file log scanner.
//!
//! Replays every line of the event log through the matcher and folder,
//! producing a fresh [`DerivedState`] on each call.

use std::path::Path;

use chrono::NaiveDate;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::error::WatcherError;
use crate::parser::{EventMatcher, ParseError};
use crate::state::{fold, DerivedState};

/// Stateless scanner that rebuilds derived state from a whole log file.
#[derive(Debug, Clone)]
pub struct LogScanner {
    matcher: EventMatcher,
}

impl LogScanner {
    /// Create a scanner with freshly compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if the event patterns fail to compile.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self::with_matcher(EventMatcher::new()?))
    }

    #[must_use]
    pub fn with_matcher(matcher: EventMatcher) -> Self {
        Self { matcher }
    }

    /// Fold a single line onto `state`.
    #[must_use]
    pub fn fold_line(&self, state: DerivedState, line: &str, today: NaiveDate) -> DerivedState {
        match self.matcher.match_line(line, today) {
            Some(event) => {
                tracing::trace!(kind = event.kind(), "Matched log event");
                fold(state, &event)
            }
            None => state,
        }
    }

    /// Scan in-memory log content from an empty state.
    #[must_use]
    pub fn scan_str(&self, content: &str, today: NaiveDate) -> DerivedState {
        content
            .lines()
            .fold(DerivedState::default(), |state, line| {
                self.fold_line(state, line, today)
            })
    }

    /// Re-scan the whole file at `path`.
    ///
    /// Never fails: a missing or unreadable file yields an empty state.
    pub async fn rescan(&self, path: &Path, today: NaiveDate) -> DerivedState {
        match self.try_rescan(path, today).await {
            Ok(state) => state,
            Err(WatcherError::MissingFile(path)) => {
                tracing::debug!(path = %path.display(), "Log file missing, using empty state");
                DerivedState::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to scan log file");
                DerivedState::default()
            }
        }
    }

    /// Re-scan the whole file at `path`, reporting read failures.
    ///
    /// # Errors
    ///
    /// Returns `WatcherError::MissingFile` if the file does not exist,
    /// `WatcherError::PermissionDenied` if it cannot be opened, or an
    /// I/O error if reading fails part-way.
    pub async fn try_rescan(
        &self,
        path: &Path,
        today: NaiveDate,
    ) -> Result<DerivedState, WatcherError> {
        let file = File::open(path)
            .await
            .map_err(|e| WatcherError::from_open(path, e))?;

        let mut reader = BufReader::new(file);
        let mut state = DerivedState::default();
        let mut buf = Vec::new();
        let mut lines = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            lines += 1;
            // Game logs are not guaranteed to be valid UTF-8.
            let line = String::from_utf8_lossy(&buf);
            state = self.fold_line(state, &line, today);
        }

        tracing::debug!(
            path = %path.display(),
            lines,
            state = ?state,
            "Scanned log file"
        );
        Ok(state)
    }
}
