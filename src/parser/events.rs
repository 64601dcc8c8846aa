//! Typed events extracted from event log lines.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An event recognised in a single log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// Player logged in.
    Login {
        /// Time of the login line, on the date the line was parsed.
        timestamp: NaiveDateTime,
        /// Character name from the welcome message.
        name: String,
    },
    /// Server uptime announcement.
    ServerUptime { days: u32, hours: u32, minutes: u32 },
    /// A meditation action completed.
    MeditationFinished {
        /// Time of the completion line, on the date the line was parsed.
        timestamp: NaiveDateTime,
    },
    /// Server-reported meditation cooldown.
    CooldownAnnounced {
        /// Minutes until the next attempt can gain skill.
        minutes: u32,
        /// Skill gains left today before the long break.
        uses_remaining: u32,
    },
}

impl LogEvent {
    /// Short name of the event kind, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::ServerUptime { .. } => "server_uptime",
            Self::MeditationFinished { .. } => "meditation_finished",
            Self::CooldownAnnounced { .. } => "cooldown_announced",
        }
    }
}
