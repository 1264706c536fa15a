//! Configuration handling for taskrank
//!
//! Configuration is read from `~/.config/taskrank/config.toml` (global) and
//! then `./.taskrank.toml` (local), with local values taking precedence.
//! Command-line flags override both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{rank, Strategy};

/// File name of the local override
pub const LOCAL_CONFIG_FILE: &str = ".taskrank.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Raw file contents; every field optional so files can be layered
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    default_strategy: Option<String>,
    suggest_limit: Option<usize>,
    session_path: Option<PathBuf>,
    default_format: Option<OutputFormat>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn overlay(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            default_strategy: other.default_strategy.or(self.default_strategy),
            suggest_limit: other.suggest_limit.or(self.suggest_limit),
            session_path: other.session_path.or(self.session_path),
            default_format: other.default_format.or(self.default_format),
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Strategy used when a command does not name one
    pub default_strategy: Strategy,

    /// Maximum number of suggested tasks
    pub suggest_limit: usize,

    /// Where the CLI keeps the current session
    pub session_path: PathBuf,

    /// Output format when `--format` is not given
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::default(),
            suggest_limit: rank::DEFAULT_SUGGESTIONS,
            session_path: Self::default_session_path(),
            default_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self> {
        let global = match Self::global_config_dir() {
            Some(dir) => ConfigFile::read(&dir.join("config.toml"))?,
            None => None,
        };
        let local = ConfigFile::read(Path::new(LOCAL_CONFIG_FILE))?;

        let merged = global
            .unwrap_or_default()
            .overlay(local.unwrap_or_default());
        Self::from_file(merged)
    }

    /// Loads configuration from a single file, ignoring the default locations
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = ConfigFile::read(path)?
            .with_context(|| format!("Config file not found: {}", path.display()))?;
        Self::from_file(file)
    }

    /// Parses configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let defaults = Self::default();

        let default_strategy = match file.default_strategy {
            Some(name) => name
                .parse::<Strategy>()
                .map_err(|e| ConfigError::Invalid(format!("default_strategy: {}", e)))?,
            None => defaults.default_strategy,
        };

        let suggest_limit = file.suggest_limit.unwrap_or(defaults.suggest_limit);
        if suggest_limit == 0 {
            return Err(ConfigError::Invalid("suggest_limit must be at least 1".to_string()).into());
        }

        Ok(Self {
            default_strategy,
            suggest_limit,
            session_path: file.session_path.unwrap_or(defaults.session_path),
            default_format: file.default_format.unwrap_or(defaults.default_format),
        })
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "taskrank", "taskrank")
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Default session location: the user data directory, or the working
    /// directory when no home directory can be determined
    pub fn default_session_path() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".taskrank-session.json"))
    }
}
