//! Derived state and the event folder.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::cooldown::meditation_count_from_uses;
use crate::parser::LogEvent;

/// State derived from the event log.
///
/// A scan always starts from [`DerivedState::default`] and replays the
/// whole file, so each field holds the most recent matching line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Last announced server uptime.
    pub server_uptime: Option<Duration>,
    /// Time of the most recent finished meditation.
    pub last_meditation: Option<NaiveDateTime>,
    /// Meditations done today, always within `0..=5`.
    pub meditation_count: Option<u8>,
}

impl DerivedState {
    /// True if no event has contributed to this state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.server_uptime.is_none()
            && self.last_meditation.is_none()
            && self.meditation_count.is_none()
    }
}

/// Fold a single event into the state.
///
/// Last write wins for each field. A cooldown announcement with an
/// impossible remaining-uses figure is logged and rejected.
#[must_use]
pub fn fold(mut state: DerivedState, event: &LogEvent) -> DerivedState {
    match event {
        LogEvent::Login { .. } => {}
        LogEvent::ServerUptime {
            days,
            hours,
            minutes,
        } => {
            let secs = u64::from(*days) * 86_400
                + u64::from(*hours) * 3_600
                + u64::from(*minutes) * 60;
            state.server_uptime = Some(Duration::from_secs(secs));
        }
        LogEvent::MeditationFinished { timestamp } => {
            state.last_meditation = Some(*timestamp);
        }
        LogEvent::CooldownAnnounced { uses_remaining, .. } => {
            match meditation_count_from_uses(*uses_remaining) {
                Ok(count) => state.meditation_count = Some(count),
                Err(e) => tracing::warn!(error = %e, "Rejecting cooldown announcement"),
            }
        }
    }
    state
}
