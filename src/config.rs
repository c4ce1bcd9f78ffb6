//! User configuration.
//!
//! Stored as TOML in `~/.haven/config.toml`. A missing file means defaults;
//! missing keys fall back to their defaults individually.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of matches returned by `match`.
pub const DEFAULT_TOP_K: usize = 5;

/// Default output path for encoded carriers.
pub const DEFAULT_OUTPUT: &str = "encoded_image.png";

/// Default tracing filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HavenConfig {
    /// Number of matches returned when `--top-k` is not given.
    pub top_k: usize,

    /// Where `encode` writes the carrier when `--output` is not given.
    pub output: PathBuf,

    /// Tracing filter used when neither `-v` nor `RUST_LOG` is set.
    pub log_level: String,
}

impl Default for HavenConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl HavenConfig {
    /// Loads the config from `path`, or from the default location if `None`.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Writes the config as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get the path to the default configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

/// Returns `~/.haven`.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".haven"))
        .ok_or(ConfigError::NoConfigDir)
}
