//! Scanning and projection tests.

mod end_to_end_test;
mod tailer_test;

/// Verify the scanning types are exported from the library.
#[test]
fn test_all_scanning_types_exported() {
    use wurm_timer::parser::{EventMatcher, LogEvent, ParseError};
    use wurm_timer::projector::{Countdown, CountdownStatus};
    use wurm_timer::state::{fold, DerivedState, Snapshot, StateError};
    use wurm_timer::watcher::{LogScanner, LogTailer, WatcherError};

    let matcher = EventMatcher::new().expect("patterns compile");
    let _ = LogScanner::with_matcher(matcher);
    let _ = fold(
        DerivedState::default(),
        &LogEvent::ServerUptime {
            days: 0,
            hours: 0,
            minutes: 1,
        },
    );
    let _ = Snapshot::default();
    let _ = Countdown::no_recent_activity();
    let _ = CountdownStatus::Available;

    let _: fn() -> StateError = || StateError::InvalidCooldownCount { uses_remaining: 6 };
    let _: fn() -> WatcherError = || WatcherError::MissingFile("x".into());
    let _: Option<ParseError> = None;
    let _: Option<LogTailer> = None;
}
