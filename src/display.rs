//! Colored terminal display for the meditation countdown.
//!
//! This module provides the terminal display surface and the small set of
//! status lines printed by the CLI commands.

use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;

use crate::projector::{Countdown, CountdownStatus, DisplaySurface};

/// Width of the progress bar in characters.
const DEFAULT_BAR_WIDTH: usize = 30;

/// Get current local time for status lines.
fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Render a text progress bar for `percent` in `0..=100`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Plain (uncolored) single-line rendering of a countdown frame.
#[must_use]
pub fn format_frame(countdown: &Countdown) -> String {
    format!(
        "{} {:>5.1}% {}",
        progress_bar(countdown.progress_percent, DEFAULT_BAR_WIDTH),
        countdown.progress_percent,
        countdown.status
    )
}

/// Countdown surface that redraws a single terminal line.
///
/// Alive until its cancellation token fires (e.g. on Ctrl-C).
#[derive(Debug)]
pub struct TerminalDisplay {
    cancel: CancellationToken,
}

impl TerminalDisplay {
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl DisplaySurface for TerminalDisplay {
    fn is_alive(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    fn render(&mut self, countdown: &Countdown) {
        let frame = format_frame(countdown);
        let line = match countdown.status {
            CountdownStatus::NoRecentActivity => frame.dimmed().to_string(),
            CountdownStatus::CoolingDown { .. } => frame.yellow().to_string(),
            CountdownStatus::Available => frame.green().bold().to_string(),
        };
        // Clear to end of line so shorter statuses leave no residue.
        print!("\r{line}\x1b[K");
        let _ = io::stdout().flush();
    }
}

/// Print the monitoring start line.
pub fn print_watch_start(player: &str, log_path: &Path) {
    println!(
        "{} {} {} {}",
        timestamp().dimmed(),
        "[WATCH]".blue().bold(),
        player.cyan(),
        log_path.display().to_string().dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print the list of characters found in an install.
pub fn print_players(install_dir: &Path, players: &[String]) {
    println!(
        "{} {}",
        "[PLAYERS]".blue().bold(),
        install_dir.display().to_string().dimmed()
    );
    if players.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for player in players {
        println!("  {}", player.cyan());
    }
    let _ = io::stdout().flush();
}

/// Print the located logs folder.
pub fn print_logs_dir(logs_dir: &Path) {
    println!(
        "{} Logs folder located: {}",
        "[LOGS]".green().bold(),
        logs_dir.display()
    );
    let _ = io::stdout().flush();
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
