//! Derived meditation state folded from log events.

mod cooldown;
mod derived;
mod snapshot;

pub use cooldown::*;
pub use derived::*;
pub use snapshot::Snapshot;
