//! Regex patterns for the recognised event log lines.
//!
//! Patterns are unanchored and case-sensitive, so lines may carry trailing
//! content after the matched text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

use super::LogEvent;

const LOGIN_PATTERN: &str =
    r"\[(\d{2}:\d{2}:\d{2})\] Welcome back, (.+)! Wurm has been waiting for you\.";
const UPTIME_PATTERN: &str = r"The server has been up (\d+) days, (\d+) hours and (\d+) minutes\.";
const MEDITATION_PATTERN: &str = r"\[(\d{2}:\d{2}:\d{2})\] You finish your meditation\.";
const COOLDOWN_PATTERN: &str = r"You can gain skill from meditating again in (\d+) minutes.* (\d+) more times today until you need to take a break\.";

/// Error type for pattern compilation.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A built-in pattern failed to compile.
    #[error("Invalid log pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Classifies event log lines into [`LogEvent`]s.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    login: Regex,
    uptime: Regex,
    meditation: Regex,
    cooldown: Regex,
}

impl EventMatcher {
    /// Compile the event patterns.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidPattern` if a pattern fails to compile.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            login: Regex::new(LOGIN_PATTERN)?,
            uptime: Regex::new(UPTIME_PATTERN)?,
            meditation: Regex::new(MEDITATION_PATTERN)?,
            cooldown: Regex::new(COOLDOWN_PATTERN)?,
        })
    }

    /// Match a single line against the event patterns.
    ///
    /// Log timestamps carry no date, so `today` is attached to them.
    /// Lines matching no pattern, or whose captures are out of range,
    /// yield `None`.
    #[must_use]
    pub fn match_line(&self, line: &str, today: NaiveDate) -> Option<LogEvent> {
        if let Some(caps) = self.login.captures(line) {
            let timestamp = timestamp_on(&caps[1], today)?;
            return Some(LogEvent::Login {
                timestamp,
                name: caps[2].to_string(),
            });
        }

        if let Some(caps) = self.uptime.captures(line) {
            return Some(LogEvent::ServerUptime {
                days: int_capture(&caps, 1)?,
                hours: int_capture(&caps, 2)?,
                minutes: int_capture(&caps, 3)?,
            });
        }

        if let Some(caps) = self.meditation.captures(line) {
            let timestamp = timestamp_on(&caps[1], today)?;
            return Some(LogEvent::MeditationFinished { timestamp });
        }

        if let Some(caps) = self.cooldown.captures(line) {
            return Some(LogEvent::CooldownAnnounced {
                minutes: int_capture(&caps, 1)?,
                uses_remaining: int_capture(&caps, 2)?,
            });
        }

        None
    }
}

fn timestamp_on(time: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    match NaiveTime::parse_from_str(time, "%H:%M:%S") {
        Ok(t) => Some(today.and_time(t)),
        Err(e) => {
            tracing::debug!(time = %time, error = %e, "Skipping line with invalid timestamp");
            None
        }
    }
}

fn int_capture(caps: &Captures<'_>, index: usize) -> Option<u32> {
    let raw = caps.get(index)?.as_str();
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(value = %raw, error = %e, "Skipping line with out-of-range number");
            None
        }
    }
}
