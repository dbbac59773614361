//! Runtime configuration: where the storage database and log file live.
//!
//! Values are resolved in order: environment (after loading `.env`), then
//! platform defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

/// Environment variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "MARKNOTE_DATA_DIR";
/// Environment variable selecting the log level (`off`, `error`, ..., `trace`).
pub const LOG_LEVEL_VAR: &str = "MARKNOTE_LOG";

const APP_DIR: &str = "marknote";
const DATABASE_FILE: &str = "storage.db";
const LOG_FILE: &str = "marknote.log";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Loads `.env` if present, then resolves from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured and the platform
    /// data directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "MARKNOTE_DATA_DIR" => Some("/tmp/notes".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert!(config.database_path().ends_with("storage.db"));
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match lookup(DATA_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let log_level = lookup(LOG_LEVEL_VAR)
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(LevelFilter::Info);

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    /// Path of the SQLite storage database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Creates the data directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_data_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })?;
        Ok(&self.data_dir)
    }
}

/// Returns `{data_dir}/marknote` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
fn default_data_dir() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join(APP_DIR))
}
