//! Monitoring session: watch target selection and snapshot publishing.

mod controller;
mod holder;

pub use controller::{MonitorSession, SessionError, SessionOptions};
pub use holder::{StateHolder, StateMessage, DEFAULT_STATE_CHANNEL_CAPACITY};
