//! End-to-end tests from raw log content to countdown frames.

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;
use wurm_timer::projector::{project, CountdownStatus};
use wurm_timer::state::cooldown_duration;
use wurm_timer::watcher::LogScanner;

const SESSION_LOG: &str = "\
Logging started 2026-03-14
[11:58:02] Welcome back, Ragnar! Wurm has been waiting for you.
[11:58:02] The server has been up 4 days, 7 hours and 12 minutes.
[11:59:10] You start meditating.
[12:00:00] You finish your meditation.
[12:00:00] You can gain skill from meditating again in 30 minutes and 3 more times today until you need to take a break.
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    today().and_hms_opt(h, m, s).unwrap()
}

fn write_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write log");
    file.flush().expect("Should flush log");
    file
}

#[tokio::test]
async fn meditation_scenario_counts_down_then_becomes_available() {
    let file = write_log(SESSION_LOG);
    let scanner = LogScanner::new().expect("patterns compile");

    let state = scanner.rescan(file.path(), today()).await;
    assert_eq!(state.last_meditation, Some(at(12, 0, 0)));
    assert_eq!(state.meditation_count, Some(2));
    assert_eq!(
        cooldown_duration(state.meditation_count.unwrap()),
        chrono::TimeDelta::minutes(30)
    );

    let during = project(&state, at(12, 29, 0));
    assert!((during.progress_percent - 96.7).abs() < 0.05);
    assert_eq!(
        during.status,
        CountdownStatus::CoolingDown { remaining_secs: 60 }
    );
    assert_eq!(during.status_text(), "Cooldown remaining: 0:01:00");

    let after = project(&state, at(12, 31, 0));
    assert_eq!(after.status, CountdownStatus::Available);
    assert!((after.progress_percent - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn rescan_twice_yields_identical_state() {
    let file = write_log(SESSION_LOG);
    let scanner = LogScanner::new().expect("patterns compile");

    let first = scanner.rescan(file.path(), today()).await;
    let second = scanner.rescan(file.path(), today()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn later_cooldown_announcement_wins() {
    let file = write_log(
        "You can gain skill from meditating again in 30 minutes and 5 more times today until you need to take a break.\n\
         You can gain skill from meditating again in 30 minutes and 2 more times today until you need to take a break.\n",
    );
    let scanner = LogScanner::new().expect("patterns compile");

    let state = scanner.rescan(file.path(), today()).await;
    assert_eq!(state.meditation_count, Some(3));
}

#[tokio::test]
async fn fourth_meditation_switches_to_long_cooldown() {
    let file = write_log(
        "[12:00:00] The server has been up 1 days, 0 hours and 0 minutes.\n\
         [12:00:00] You finish your meditation.\n\
         [12:00:00] You can gain skill from meditating again in 180 minutes and 1 more times today until you need to take a break.\n",
    );
    let scanner = LogScanner::new().expect("patterns compile");

    let state = scanner.rescan(file.path(), today()).await;
    assert_eq!(state.meditation_count, Some(4));

    let countdown = project(&state, at(12, 31, 0));
    assert_eq!(
        countdown.status,
        CountdownStatus::CoolingDown {
            remaining_secs: 149 * 60
        }
    );
}

#[tokio::test]
async fn unrelated_lines_report_no_recent_activity() {
    for content in ["", "[10:00:00] You start meditating.\nLogging started\n"] {
        let file = write_log(content);
        let scanner = LogScanner::new().expect("patterns compile");

        let state = scanner.rescan(file.path(), today()).await;
        let countdown = project(&state, at(12, 0, 0));
        assert_eq!(countdown.status, CountdownStatus::NoRecentActivity);
        assert!(countdown.progress_percent.is_finite());
        assert!(countdown.progress_percent >= 0.0);
    }
}

#[tokio::test]
async fn impossible_cooldown_count_does_not_abort_scan() {
    let file = write_log(
        "You can gain skill from meditating again in 30 minutes and 4 more times today until you need to take a break.\n\
         You can gain skill from meditating again in 30 minutes and 9 more times today until you need to take a break.\n\
         [12:00:00] You finish your meditation.\n",
    );
    let scanner = LogScanner::new().expect("patterns compile");

    let state = scanner.rescan(file.path(), today()).await;
    assert_eq!(state.meditation_count, Some(1));
    assert_eq!(state.last_meditation, Some(at(12, 0, 0)));
}
