//! Configuration file handling.
//!
//! Loading and saving of imagescan configuration from a TOML file at:
//! - Linux: `~/.config/imagescan/config.toml`
//! - macOS: `~/Library/Application Support/imagescan/config.toml`
//! - Windows: `%APPDATA%\imagescan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! version_aware = false
//! save_report = true
//! report_dir = "."
//! database_path = "/var/lib/imagescan/corpus.json"
//! ```
//!
//! Command-line flags override configuration values.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to filter out vulnerabilities the installed version already
    /// carries the fix for. Default false: every known vulnerability for a
    /// package name is reported.
    pub version_aware: bool,

    /// Whether to persist the JSON report after printing the summary.
    ///
    /// Default: true
    pub save_report: bool,

    /// Directory the JSON report is written into.
    ///
    /// Default: current directory
    pub report_dir: PathBuf,

    /// Optional path to a JSON corpus file. When unset, the bundled sample
    /// entries are used.
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version_aware: false,
            save_report: true,
            report_dir: PathBuf::from("."),
            database_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("imagescan")
            .join("config.toml")
    }
}
