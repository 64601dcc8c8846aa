//! Incremental event log tailer.
//!
//! Folds only lines appended since the last read onto the retained state.

use std::io::SeekFrom;
use std::path::PathBuf;

use chrono::NaiveDate;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};

use super::error::WatcherError;
use super::scanner::LogScanner;
use crate::state::DerivedState;

/// Incremental log reader that tracks read position.
///
/// Produces the same state a full [`LogScanner::rescan`] would: it replays
/// from the start whenever the file shrinks, is rewritten, disappears, or
/// the local date changes. A trailing line without a newline is folded into
/// the returned state but re-read on the next call.
#[derive(Debug)]
pub struct LogTailer {
    /// Path to the event log.
    path: PathBuf,
    scanner: LogScanner,
    /// Byte offset just past the last complete line folded.
    offset: u64,
    state: DerivedState,
    /// Date attached to timestamps folded so far.
    scanned_on: Option<NaiveDate>,
    /// First complete line folded, used to detect a rewritten file.
    head: Vec<u8>,
    /// Last complete line folded, ending at `offset`.
    tail: Vec<u8>,
}

impl LogTailer {
    /// Create a new tailer for the given path, starting at the beginning.
    #[must_use]
    pub fn new(path: PathBuf, scanner: LogScanner) -> Self {
        Self {
            path,
            scanner,
            offset: 0,
            state: DerivedState::default(),
            scanned_on: None,
            head: Vec::new(),
            tail: Vec::new(),
        }
    }

    /// Get the current byte offset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read appended lines and return the updated state.
    ///
    /// Never fails: a missing or unreadable file yields an empty state.
    pub async fn read_state(&mut self, today: NaiveDate) -> DerivedState {
        match self.try_read_state(today).await {
            Ok(state) => state,
            Err(e) => {
                if matches!(e, WatcherError::MissingFile(_)) {
                    tracing::debug!(path = %self.path.display(), "Log file missing, using empty state");
                } else {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to tail log file");
                }
                self.reset();
                DerivedState::default()
            }
        }
    }

    /// Read appended lines and return the updated state.
    ///
    /// Retained state only advances once every complete line has been read.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened (missing, permission denied)
    /// - I/O errors occur during reading
    pub async fn try_read_state(&mut self, today: NaiveDate) -> Result<DerivedState, WatcherError> {
        let mut file = File::open(&self.path)
            .await
            .map_err(|e| WatcherError::from_open(&self.path, e))?;

        let file_len = file.metadata().await?.len();

        if file_len < self.offset {
            tracing::warn!(
                path = %self.path.display(),
                old_offset = self.offset,
                new_len = file_len,
                "Log file truncated, replaying from start"
            );
            self.reset();
        } else if !self.prefix_unchanged(&mut file).await? {
            tracing::warn!(path = %self.path.display(), "Log file rewritten, replaying from start");
            self.reset();
        }

        if self.scanned_on.is_some_and(|date| date != today) {
            tracing::debug!(path = %self.path.display(), "Date changed, replaying from start");
            self.reset();
        }
        self.scanned_on = Some(today);

        if file_len == self.offset {
            return Ok(self.state.clone());
        }

        file.seek(SeekFrom::Start(self.offset)).await?;

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut state = self.state.clone();
        let mut offset = self.offset;
        let mut head = self.head.clone();
        let mut tail = self.tail.clone();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 || buf.last() != Some(&b'\n') {
                // EOF or a line still being written.
                break;
            }

            if offset == 0 {
                head.clone_from(&buf);
            }
            tail.clone_from(&buf);
            offset += bytes_read as u64;
            let line = String::from_utf8_lossy(&buf);
            state = self.scanner.fold_line(state, &line, today);
        }

        self.offset = offset;
        self.head = head;
        self.tail = tail;
        self.state = state;

        if buf.is_empty() {
            return Ok(self.state.clone());
        }
        let partial = String::from_utf8_lossy(&buf);
        Ok(self.scanner.fold_line(self.state.clone(), &partial, today))
    }

    /// Whether the bytes already folded are still at the start of the file.
    async fn prefix_unchanged(&self, file: &mut File) -> Result<bool, WatcherError> {
        if self.offset == 0 {
            return Ok(true);
        }

        let mut head = vec![0; self.head.len()];
        file.seek(SeekFrom::Start(0)).await?;
        file.read_exact(&mut head).await?;

        let tail_start = self.offset.saturating_sub(self.tail.len() as u64);
        let mut tail = vec![0; self.tail.len()];
        file.seek(SeekFrom::Start(tail_start)).await?;
        file.read_exact(&mut tail).await?;

        Ok(head == self.head && tail == self.tail)
    }

    /// Forget everything read so far.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.state = DerivedState::default();
        self.scanned_on = None;
        self.head.clear();
        self.tail.clear();
    }
}
