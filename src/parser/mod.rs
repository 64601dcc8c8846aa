//! Line classification for Wurm Online event logs.
//!
//! Maps a single log line to at most one typed [`LogEvent`].

mod events;
mod matcher;

pub use events::LogEvent;
pub use matcher::{EventMatcher, ParseError};
