//! FocusFlow configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main FocusFlow configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Local decomposition engine
    pub decompose: DecomposeConfig,

    /// Remote decomposition backend
    pub remote: RemoteConfig,

    /// Focus session settings
    pub focus: FocusConfig,

    /// Coach messages
    pub coach: CoachConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if let Some(command) = &self.remote.command {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(eyre::eyre!("remote.command must name a program"));
            }
        }
        if self.remote.timeout_ms == 0 {
            return Err(eyre::eyre!("remote.timeout-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .focusflow.yml
        let local_config = PathBuf::from(".focusflow.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/focusflow/focusflow.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("focusflow").join("focusflow.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Local decomposition engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Fixed RNG seed for reproducible decompositions
    pub seed: Option<u64>,
}

/// Remote decomposition backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Command (program and arguments) that reads a prompt on stdin and
    /// writes the completion to stdout; unset means local only
    pub command: Option<Vec<String>>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Model name the command talks to
    pub model: String,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_ms: 30_000,
            model: "mistral-large".to_string(),
        }
    }
}

/// Focus session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Suggested break after a session, in minutes
    #[serde(rename = "break-minutes")]
    pub break_minutes: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self { break_minutes: 15 }
    }
}

/// Coach message configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Show coach messages on session events
    pub enabled: bool,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
