//! Cooldown projection.
//!
//! Turns the latest derived-state snapshot and the wall clock into a
//! countdown frame once per second.

mod clock;
mod countdown;
mod surface;
mod ticker;

pub use clock::{Clock, FixedClock, LocalClock};
pub use countdown::{format_remaining, project, Countdown, CountdownStatus};
pub use surface::{ChannelSurface, DisplaySurface};
pub use ticker::{CountdownProjector, ProjectorExit, DEFAULT_TICK};
