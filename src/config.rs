//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. the `--config` command-line argument
//! 2. `$MAILDETACH_CONFIG` (environment variable)
//! 3. `~/.config/maildetach/config.toml` (Linux), the platform config dir elsewhere
//! 4. Built-in defaults
//!
//! Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DetachError, Result};
use crate::extract::StageOptions;
use crate::pipeline::JobOptions;

/// Default input size limit: 256 MB.
pub const DEFAULT_MAX_MESSAGE_SIZE: u64 = 256 * 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub general: GeneralConfig,
    /// Where and how attachments are delivered.
    pub delivery: DeliveryConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Also append logs to `maildetach.log` in this directory.
    pub log_dir: Option<PathBuf>,
    /// Logging facility name (syslog names, e.g. "mail", "local3").
    pub facility: String,
}

/// Delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Destination directory, when not given on the command line.
    pub dest_dir: Option<PathBuf>,
    /// Largest accepted message in bytes.
    pub max_message_size: u64,
    /// Permission bits for delivered files (e.g. `0o640`). Umask if unset.
    pub file_mode: Option<u32>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            facility: "user".to_string(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            dest_dir: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            file_mode: None,
        }
    }
}

impl DeliveryConfig {
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            max_message_size: self.max_message_size,
            stage: StageOptions {
                file_mode: self.file_mode,
            },
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration.
///
/// An explicit path must exist. Otherwise a missing file means defaults.
/// A file that exists but cannot be read or parsed is an error: delivering
/// with the wrong settings is worse than asking the MTA to retry.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| DetachError::Config(format!("{}: {e}", path.display())))?;
    let config = parse_config(&contents)
        .map_err(|e| DetachError::Config(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILDETACH_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("maildetach").join("config.toml"))
}
