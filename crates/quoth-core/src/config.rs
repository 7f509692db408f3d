//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/quoth/config.toml)
//! 3. Environment variables (QUOTH_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "QUOTH";

/// Remote endpoint used when none is configured
pub const DEFAULT_SYNC_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Seconds between periodic sync cycles
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for durable slots (quotes, selected category)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base directory for per-session slots (last shown quote)
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,

    /// Remote quote endpoint
    #[serde(default = "default_sync_url")]
    pub sync_url: String,

    /// Whether remote sync is enabled
    #[serde(default)]
    pub sync_enabled: bool,

    /// Seconds between periodic sync cycles
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Log file (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_dir: default_session_dir(),
            sync_url: default_sync_url(),
            sync_enabled: false,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (QUOTH_DATA_DIR, QUOTH_SYNC_URL, ...)
    /// 2. Config file (~/.config/quoth/config.toml or QUOTH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_SESSION_DIR", ENV_PREFIX)) {
            self.session_dir = PathBuf::from(val);
        }

        // An empty value restores the default endpoint
        if let Ok(val) = std::env::var(format!("{}_SYNC_URL", ENV_PREFIX)) {
            self.sync_url = if val.is_empty() { default_sync_url() } else { val };
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_ENABLED", ENV_PREFIX)) {
            self.sync_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_INTERVAL", ENV_PREFIX)) {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => self.sync_interval_secs = secs,
                _ => tracing::warn!("Ignoring invalid {}_SYNC_INTERVAL={:?}", ENV_PREFIX, val),
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with QUOTH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quoth")
            .join("config.toml")
    }

    /// Directory holding this session's ephemeral slots
    pub fn session_path(&self) -> PathBuf {
        self.session_dir.join(format!("session-{}", session_id()))
    }

    /// Interval between periodic sync cycles
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }
}

/// Identify the current session
///
/// `QUOTH_SESSION` wins; otherwise the parent process (the invoking
/// shell) identifies the session on unix.
pub fn session_id() -> String {
    if let Ok(id) = std::env::var(format!("{}_SESSION", ENV_PREFIX)) {
        if !id.is_empty() {
            return id;
        }
    }

    process_session_id()
}

#[cfg(unix)]
fn process_session_id() -> String {
    std::os::unix::process::parent_id().to_string()
}

#[cfg(not(unix))]
fn process_session_id() -> String {
    "default".to_string()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quoth")
}

/// Get the default session directory (cleared at logout where supported)
fn default_session_dir() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quoth")
}

fn default_sync_url() -> String {
    DEFAULT_SYNC_URL.to_string()
}

fn default_sync_interval_secs() -> u64 {
    DEFAULT_SYNC_INTERVAL_SECS
}
