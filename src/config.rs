//! Application configuration.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Top-level configuration, loadable from TOML.
///
/// Every section and field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    server: ServerConfig,
    /// Persistence settings.
    storage: StorageConfig,
    /// Word list locations.
    words: WordsConfig,
    /// Leaderboard settings.
    leaderboard: LeaderboardConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    host: String,
    /// Port to bind.
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. In-memory stores are used when absent.
    database_path: Option<PathBuf>,
}

/// Word list locations. Built-in lists are used for missing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct WordsConfig {
    /// Secret word candidates, one per line.
    answers_path: Option<PathBuf>,
    /// Additional accepted guesses, one per line.
    guesses_path: Option<PathBuf>,
}

/// Leaderboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Number of entries returned by the leaderboard query.
    size: usize,
    /// Feed finished games into the leaderboard without a separate result
    /// submission.
    report_results: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            size: 10,
            report_results: false,
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text and validates it.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(
            database = ?config.storage.database_path,
            port = config.server.port,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            warn!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validates configuration values.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard.size == 0 {
            return Err(ConfigError::new("leaderboard.size must be > 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::new("server.host must not be empty"));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
