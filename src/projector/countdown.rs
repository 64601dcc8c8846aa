//! Cooldown projection from derived state and wall-clock time.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::state::{cooldown_duration, DerivedState};

/// What the countdown display should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CountdownStatus {
    /// No meditation or server uptime seen in the log.
    NoRecentActivity,
    /// Cooldown still running.
    CoolingDown {
        /// Whole seconds left, truncated.
        remaining_secs: i64,
    },
    /// Cooldown has expired.
    Available,
}

impl std::fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRecentActivity => write!(f, "No recent meditation detected."),
            Self::CoolingDown { remaining_secs } => {
                write!(f, "Cooldown remaining: {}", format_remaining(*remaining_secs))
            }
            Self::Available => write!(f, "Meditation available now!"),
        }
    }
}

/// One projected countdown frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Cooldown progress, always within `0.0..=100.0`.
    pub progress_percent: f64,
    #[serde(flatten)]
    pub status: CountdownStatus,
}

impl Countdown {
    #[must_use]
    pub fn no_recent_activity() -> Self {
        Self {
            progress_percent: 0.0,
            status: CountdownStatus::NoRecentActivity,
        }
    }

    /// Status line shown next to the progress bar.
    #[must_use]
    pub fn status_text(&self) -> String {
        self.status.to_string()
    }
}

/// Project the cooldown countdown at wall-clock time `now`.
///
/// An unknown meditation count is treated as zero meditations today.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn project(state: &DerivedState, now: NaiveDateTime) -> Countdown {
    let (Some(last), Some(_)) = (state.last_meditation, state.server_uptime) else {
        return Countdown::no_recent_activity();
    };

    let cooldown = cooldown_duration(state.meditation_count.unwrap_or(0));
    let elapsed = now - last;
    let remaining = cooldown - elapsed;

    if remaining > TimeDelta::zero() {
        let ratio = elapsed.num_milliseconds() as f64 / cooldown.num_milliseconds() as f64;
        Countdown {
            progress_percent: ratio.clamp(0.0, 1.0) * 100.0,
            status: CountdownStatus::CoolingDown {
                remaining_secs: remaining.num_seconds(),
            },
        }
    } else {
        Countdown {
            progress_percent: 100.0,
            status: CountdownStatus::Available,
        }
    }
}

/// Format whole seconds as `H:MM:SS`, prefixed with days when needed.
///
/// # Examples
///
/// ```
/// use wurm_timer::projector::format_remaining;
///
/// assert_eq!(format_remaining(60), "0:01:00");
/// assert_eq!(format_remaining(3 * 3600), "3:00:00");
/// ```
#[must_use]
pub fn format_remaining(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        d => format!("{d} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
