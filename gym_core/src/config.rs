//! Configuration file support for GymTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gymtrack/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_db_file")]
    pub db_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file: default_db_file(),
        }
    }
}

/// SQLite connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// How long a writer waits for another connection's lock
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Workout recording parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Aborted workouts shorter than this are discarded from the health tracker
    #[serde(default = "default_discard_threshold_seconds")]
    pub discard_threshold_seconds: i64,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            discard_threshold_seconds: default_discard_threshold_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("gymtrack")
}

fn default_db_file() -> String {
    "gymtrack.sqlite".into()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_discard_threshold_seconds() -> i64 {
    300
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("gymtrack").join("config.toml")
    }

    /// Full path of the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.db_file)
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.data.db_file.trim().is_empty() {
            return Err(Error::Config("data.db_file must not be empty".into()));
        }
        if self.workout.discard_threshold_seconds < 0 {
            return Err(Error::Config(
                "workout.discard_threshold_seconds must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
