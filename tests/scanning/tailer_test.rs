//! Incremental tailing must agree with full re-scans.

use std::io::Write;

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use wurm_timer::watcher::{LogScanner, LogTailer};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

#[tokio::test]
async fn tailer_tracks_growing_log_like_full_scan() {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    let scanner = LogScanner::new().expect("patterns compile");
    let mut tailer = LogTailer::new(file.path().to_path_buf(), scanner.clone());

    let lines = [
        "[11:58:02] The server has been up 4 days, 7 hours and 12 minutes.",
        "[12:00:00] You finish your meditation.",
        "[12:00:00] You can gain skill from meditating again in 30 minutes and 4 more times today until you need to take a break.",
        "[12:31:00] You finish your meditation.",
        "[12:31:00] You can gain skill from meditating again in 30 minutes and 3 more times today until you need to take a break.",
    ];

    for line in lines {
        writeln!(file, "{line}").expect("Should append");
        file.flush().expect("Should flush");

        let incremental = tailer.read_state(today()).await;
        let full = scanner.rescan(file.path(), today()).await;
        assert_eq!(incremental, full, "diverged after appending {line:?}");
    }
}
