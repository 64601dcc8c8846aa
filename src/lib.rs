//! Wurm Timer - Meditation cooldown tracker for Wurm Online event logs.

pub mod config;
pub mod display;
pub mod parser;
pub mod projector;
pub mod session;
pub mod state;
pub mod watcher;
