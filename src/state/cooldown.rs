//! Meditation cooldown rules.

use chrono::TimeDelta;

/// Skill gains available per day before the long break.
pub const DAILY_MEDITATIONS: u8 = 5;

/// Meditation count at which the long cooldown applies.
pub const LONG_COOLDOWN_THRESHOLD: u8 = 4;

/// Cooldown while below the threshold.
pub const SHORT_COOLDOWN: TimeDelta = TimeDelta::minutes(30);

/// Cooldown once the threshold is reached.
pub const LONG_COOLDOWN: TimeDelta = TimeDelta::hours(3);

/// Error type for state folding.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The server reported more remaining uses than a day allows.
    #[error("Invalid cooldown count: {uses_remaining} uses remaining exceeds daily limit of 5")]
    InvalidCooldownCount { uses_remaining: u32 },
}

/// Convert the server's remaining-uses figure into meditations done today.
///
/// # Errors
///
/// Returns `StateError::InvalidCooldownCount` if `uses_remaining` exceeds
/// the daily limit.
pub fn meditation_count_from_uses(uses_remaining: u32) -> Result<u8, StateError> {
    u8::try_from(uses_remaining)
        .ok()
        .and_then(|uses| DAILY_MEDITATIONS.checked_sub(uses))
        .ok_or(StateError::InvalidCooldownCount { uses_remaining })
}

/// Cooldown length after a meditation, given the count done today.
#[must_use]
pub fn cooldown_duration(meditation_count: u8) -> TimeDelta {
    if meditation_count < LONG_COOLDOWN_THRESHOLD {
        SHORT_COOLDOWN
    } else {
        LONG_COOLDOWN
    }
}
