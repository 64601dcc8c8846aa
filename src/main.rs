//! Wurm Timer - Meditation cooldown tracker for Wurm Online event logs.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wurm_timer::config::{ConfigError, ConfigLoader, Settings, LEGACY_SETTINGS_FILE};
use wurm_timer::display::{self, TerminalDisplay};
use wurm_timer::parser::ParseError;
use wurm_timer::projector::{project, Clock, CountdownProjector, LocalClock};
use wurm_timer::session::{MonitorSession, SessionError, SessionOptions};
use wurm_timer::state::DerivedState;
use wurm_timer::watcher::{
    current_year_month, list_players, locate_logs_dir, LogScanner, WatchTarget, WatcherError,
};

/// Errors reported by the CLI commands.
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Please select the Wurm Online directory and character")]
    MissingTarget,

    #[error("Please select the Wurm Online directory")]
    MissingInstallDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Watcher(#[from] WatcherError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to encode scan report: {0}")]
    Report(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(
    name = "wurm-timer",
    about = "Meditation cooldown tracker for Wurm Online event logs",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of the default search paths.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wurm Online install directory.
    #[arg(long, global = true)]
    install_dir: Option<PathBuf>,

    /// Character to monitor.
    #[arg(long, global = true)]
    player: Option<String>,

    /// Log month to read (YYYY-MM), defaults to the current month.
    #[arg(long, global = true)]
    month: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the event log and show the meditation countdown.
    Watch,
    /// Scan the event log once and print the derived state as JSON.
    Scan,
    /// List characters found in the install directory.
    Players,
    /// Locate the logs folder of the selected character.
    LocateLogs,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load settings from file (or legacy settings) and apply CLI overrides.
fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut settings = loader.load()?;

    if settings.target().is_none() && loader.find_config_file().is_none() {
        match ConfigLoader::load_legacy(&PathBuf::from(LEGACY_SETTINGS_FILE)) {
            Ok(Some(legacy)) => {
                settings.install_dir = settings.install_dir.or(legacy.install_dir);
                settings.player_name = settings.player_name.or(legacy.player_name);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable legacy settings"),
        }
    }

    if let Some(dir) = &cli.install_dir {
        settings.install_dir = Some(dir.clone());
    }
    if let Some(player) = &cli.player {
        settings.player_name = Some(player.clone());
    }
    if let Some(month) = &cli.month {
        settings.log_month = Some(month.clone());
    }
    Ok(settings)
}

fn require_target(settings: &Settings) -> Result<WatchTarget, CliError> {
    settings.target().ok_or(CliError::MissingTarget)
}

async fn run_watch(settings: &Settings) -> Result<(), CliError> {
    let target = require_target(settings)?;
    let clock: Arc<dyn Clock> = Arc::new(LocalClock);

    let mut session = MonitorSession::new(SessionOptions::from(settings), Arc::clone(&clock))?;
    if let Err(e) = session.select(target.clone()).await {
        session.shutdown().await;
        return Err(e.into());
    }
    if let Some(path) = session.log_path() {
        display::print_watch_start(&target.player_name, path);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        }
        ctrl_c.cancel();
    });

    let projector = CountdownProjector::new(settings.tick(), clock);
    let exit = projector
        .run(
            session.subscribe(),
            TerminalDisplay::new(cancel.clone()),
            cancel,
        )
        .await;
    println!();
    tracing::debug!(?exit, "Countdown finished");

    session.shutdown().await;
    Ok(())
}

async fn run_scan(settings: &Settings) -> Result<(), CliError> {
    let target = require_target(settings)?;
    let clock = LocalClock;
    let month = settings
        .log_month
        .clone()
        .unwrap_or_else(current_year_month);
    let log_path = target.log_file_path(&month);

    let scanner = LogScanner::new()?;
    let state = match scanner.try_rescan(&log_path, clock.today()).await {
        Ok(state) => state,
        Err(WatcherError::MissingFile(path)) => {
            tracing::warn!(path = %path.display(), "Log file not found, reporting empty state");
            DerivedState::default()
        }
        Err(e) => return Err(e.into()),
    };
    let countdown = project(&state, clock.now());

    let report = serde_json::json!({
        "log_path": log_path,
        "state": state,
        "countdown": countdown,
        "status_text": countdown.status_text(),
    });
    let pretty = serde_json::to_string_pretty(&report)?;
    println!("{pretty}");
    Ok(())
}

fn run_players(settings: &Settings) -> Result<(), CliError> {
    let install_dir = settings
        .install_dir
        .as_ref()
        .ok_or(CliError::MissingInstallDir)?;
    let players = list_players(install_dir)?;
    display::print_players(install_dir, &players);
    Ok(())
}

fn run_locate_logs(settings: &Settings) -> Result<(), CliError> {
    let target = require_target(settings)?;
    let logs_dir = locate_logs_dir(&target)?;
    display::print_logs_dir(&logs_dir);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match load_settings(&cli) {
        Ok(settings) => {
            tracing::debug!(settings = ?settings, "Loaded settings");
            match cli.command {
                Commands::Watch => run_watch(&settings).await,
                Commands::Scan => run_scan(&settings).await,
                Commands::Players => run_players(&settings),
                Commands::LocateLogs => run_locate_logs(&settings),
            }
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
