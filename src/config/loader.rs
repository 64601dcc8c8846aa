//! Configuration file loader.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::Settings;

/// File name of the legacy JSON settings file.
pub const LEGACY_SETTINGS_FILE: &str = "settings.txt";

/// Legacy JSON settings format.
#[derive(Debug, Deserialize)]
struct LegacySettings {
    #[serde(default)]
    wurm_dir: String,
    #[serde(default)]
    player_name: String,
}

impl From<LegacySettings> for Settings {
    fn from(legacy: LegacySettings) -> Self {
        Self {
            install_dir: Some(PathBuf::from(legacy.wurm_dir))
                .filter(|p| !p.as_os_str().is_empty()),
            player_name: Some(legacy.player_name).filter(|p| !p.is_empty()),
            ..Self::default()
        }
    }
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .wurm-timer.toml
        search_paths.push(PathBuf::from(".wurm-timer.toml"));

        // 2. User config directory: ~/.config/wurm-timer/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("wurm-timer").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load settings from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Settings::default())
    }

    /// Load settings from a specific path.
    fn load_from_path(path: &Path) -> Result<Settings, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Import a legacy JSON `settings.txt` (`wurm_dir`, `player_name`).
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_legacy(path: &Path) -> Result<Option<Settings>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let legacy: LegacySettings =
            serde_json::from_str(&content).map_err(|e| ConfigError::LegacyParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), "Loaded legacy settings");
        Ok(Some(legacy.into()))
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse legacy settings {path}: {source}")]
    LegacyParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
