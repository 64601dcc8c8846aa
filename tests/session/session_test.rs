//! Integration tests for the monitoring session.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tempfile::TempDir;
use tokio::sync::watch;
use tokio_test::assert_ok;
use wurm_timer::config::ScanMode;
use wurm_timer::projector::{Clock, FixedClock};
use wurm_timer::session::{MonitorSession, SessionError, SessionOptions};
use wurm_timer::state::Snapshot;
use wurm_timer::watcher::{WatchTarget, WatcherError};

const MONTH: &str = "2026-03";

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 29, 0)
            .unwrap(),
    ))
}

fn options(scan_mode: ScanMode) -> SessionOptions {
    SessionOptions {
        scan_mode,
        debounce: Duration::from_millis(20),
        log_month: Some(MONTH.to_string()),
    }
}

/// Create `players/<name>/logs/` and return the event log path.
fn create_player(install_dir: &Path, name: &str, content: &str) -> PathBuf {
    let target = WatchTarget::new(install_dir, name);
    std::fs::create_dir_all(target.logs_dir()).expect("Should create logs dir");
    let path = target.log_file_path(MONTH);
    std::fs::write(&path, content).expect("Should write log");
    path
}

fn append(path: &Path, line: &str) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .expect("Should open log");
    writeln!(file, "{line}").expect("Should append");
}

async fn wait_for(
    rx: &mut watch::Receiver<Arc<Snapshot>>,
    timeout: Duration,
    predicate: impl Fn(&Snapshot) -> bool,
) -> Option<Arc<Snapshot>> {
    let result = tokio::time::timeout(timeout, rx.wait_for(|s| predicate(s.as_ref()))).await;
    match result {
        Ok(Ok(snapshot)) => Some(Arc::clone(&snapshot)),
        _ => None,
    }
}

/// Select a target, or return `None` if the platform refuses more watches.
async fn select_or_skip(session: &mut MonitorSession, target: WatchTarget) -> Option<()> {
    match session.select(target).await {
        Ok(()) => Some(()),
        Err(SessionError::Watcher(WatcherError::SetupFailed { source, .. })) => {
            eprintln!("Skipping test due to system limit: {source}");
            None
        }
        Err(e) => panic!("Unexpected error: {e}"),
    }
}

#[tokio::test]
async fn select_scans_existing_log_immediately() {
    let temp_dir = TempDir::new().unwrap();
    create_player(
        temp_dir.path(),
        "anna",
        "[11:00:00] The server has been up 2 days, 1 hours and 0 minutes.\n\
         [12:00:00] You finish your meditation.\n\
         [12:00:00] You can gain skill from meditating again in 30 minutes and 3 more times today until you need to take a break.\n",
    );

    let mut session = MonitorSession::new(options(ScanMode::Full), clock()).unwrap();
    let mut rx = session.subscribe();
    if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "anna"))
        .await
        .is_none()
    {
        return;
    }

    let snapshot = wait_for(&mut rx, Duration::from_secs(2), |s| {
        s.state.meditation_count.is_some()
    })
    .await
    .expect("initial scan should publish a snapshot");
    assert_eq!(snapshot.state.meditation_count, Some(2));
    assert_eq!(snapshot.generation, session.generation());
    assert_eq!(snapshot.log_path.as_deref(), session.log_path());

    session.shutdown().await;
}

#[tokio::test]
async fn missing_log_file_publishes_empty_state() {
    let temp_dir = TempDir::new().unwrap();
    let target = WatchTarget::new(temp_dir.path(), "anna");
    std::fs::create_dir_all(target.logs_dir()).unwrap();

    let mut session = MonitorSession::new(options(ScanMode::Full), clock()).unwrap();
    let mut rx = session.subscribe();
    if select_or_skip(&mut session, target).await.is_none() {
        return;
    }
    assert_ok!(session.rescan_now().await);

    let snapshot = wait_for(&mut rx, Duration::from_secs(2), |s| s.generation == 1)
        .await
        .expect("retarget should publish");
    assert!(snapshot.state.is_empty());
    assert!(snapshot.log_path.is_some());

    session.shutdown().await;
}

#[tokio::test]
async fn watcher_publishes_appended_lines() {
    for mode in [ScanMode::Full, ScanMode::Incremental] {
        let temp_dir = TempDir::new().unwrap();
        let log = create_player(temp_dir.path(), "anna", "");

        let mut session = MonitorSession::new(options(mode), clock()).unwrap();
        let mut rx = session.subscribe();
        if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "anna"))
            .await
            .is_none()
        {
            return;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        append(&log, "[12:00:00] You finish your meditation.");

        let snapshot = wait_for(&mut rx, Duration::from_secs(5), |s| {
            s.state.last_meditation.is_some()
        })
        .await
        .unwrap_or_else(|| panic!("{mode:?} scan should publish the appended meditation"));
        assert_eq!(snapshot.generation, 1);

        session.shutdown().await;
    }
}

#[tokio::test]
async fn watcher_picks_up_log_created_after_select() {
    for mode in [ScanMode::Full, ScanMode::Incremental] {
        let temp_dir = TempDir::new().unwrap();
        let target = WatchTarget::new(temp_dir.path(), "anna");
        std::fs::create_dir_all(target.logs_dir()).unwrap();
        let log = target.log_file_path(MONTH);

        let mut session = MonitorSession::new(options(mode), clock()).unwrap();
        let mut rx = session.subscribe();
        if select_or_skip(&mut session, target).await.is_none() {
            return;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        append(
            &log,
            "[12:00:00] You can gain skill from meditating again in 30 minutes and 2 more times today until you need to take a break.",
        );

        let snapshot = wait_for(&mut rx, Duration::from_secs(5), |s| {
            s.state.meditation_count.is_some()
        })
        .await
        .unwrap_or_else(|| panic!("{mode:?} scan should publish the new log file"));
        assert_eq!(snapshot.state.meditation_count, Some(3));

        session.shutdown().await;
    }
}

#[tokio::test]
async fn manual_rescan_matches_file_contents() {
    let temp_dir = TempDir::new().unwrap();
    let log = create_player(temp_dir.path(), "anna", "");

    let mut session = MonitorSession::new(options(ScanMode::Full), clock()).unwrap();
    let mut rx = session.subscribe();
    if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "anna"))
        .await
        .is_none()
    {
        return;
    }

    append(&log, "The server has been up 1 days, 2 hours and 3 minutes.");
    assert_ok!(session.rescan_now().await);

    let snapshot = wait_for(&mut rx, Duration::from_secs(2), |s| {
        s.state.server_uptime.is_some()
    })
    .await
    .expect("rescan should publish the uptime");
    assert_eq!(
        snapshot.state.server_uptime,
        Some(Duration::from_secs(86_400 + 7_200 + 180))
    );

    session.shutdown().await;
}

#[tokio::test]
async fn switching_player_replaces_state_and_ignores_old_log() {
    let temp_dir = TempDir::new().unwrap();
    let anna_log = create_player(
        temp_dir.path(),
        "anna",
        "You can gain skill from meditating again in 30 minutes and 1 more times today until you need to take a break.\n",
    );
    create_player(temp_dir.path(), "bert", "");

    let mut session = MonitorSession::new(options(ScanMode::Full), clock()).unwrap();
    let mut rx = session.subscribe();
    if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "anna"))
        .await
        .is_none()
    {
        return;
    }
    wait_for(&mut rx, Duration::from_secs(2), |s| {
        s.state.meditation_count == Some(4)
    })
    .await
    .expect("anna's log should be scanned");

    if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "bert"))
        .await
        .is_none()
    {
        return;
    }
    assert_eq!(session.generation(), 2);
    assert_eq!(
        session.target().map(|t| t.player_name.as_str()),
        Some("bert")
    );

    let snapshot = wait_for(&mut rx, Duration::from_secs(2), |s| s.generation == 2)
        .await
        .expect("retarget should publish");
    assert!(snapshot.state.is_empty());

    append(&anna_log, "[12:00:00] You finish your meditation.");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert!(snapshot.state.is_empty());

    session.shutdown().await;
}

#[tokio::test]
async fn stop_discards_state() {
    let temp_dir = TempDir::new().unwrap();
    create_player(
        temp_dir.path(),
        "anna",
        "[12:00:00] You finish your meditation.\n",
    );

    let mut session = MonitorSession::new(options(ScanMode::Full), clock()).unwrap();
    let mut rx = session.subscribe();
    if select_or_skip(&mut session, WatchTarget::new(temp_dir.path(), "anna"))
        .await
        .is_none()
    {
        return;
    }
    wait_for(&mut rx, Duration::from_secs(2), |s| {
        s.state.last_meditation.is_some()
    })
    .await
    .expect("initial scan should publish");

    assert_ok!(session.stop().await);
    let snapshot = wait_for(&mut rx, Duration::from_secs(2), |s| s.log_path.is_none())
        .await
        .expect("stop should publish an empty snapshot");
    assert!(snapshot.state.is_empty());
    assert!(session.target().is_none());

    session.shutdown().await;
}
