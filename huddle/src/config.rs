//! Configuration system for huddle.
//!
//! Configuration is merged from multiple sources with the following
//! precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`ConfigBuilder::with_config`])
//! 2. Environment variables (`HUDDLE_*`)
//! 3. User config file (`~/.huddle/config.yaml`)
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use huddle::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .build()
//!     .unwrap();
//! assert!(config.data_dir.is_none());
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Complete configuration structure.
///
/// Every field is optional; unset fields fall through to the next source
/// in the precedence chain and finally to the built-in defaults applied by
/// the consumer (the CLI, a host service).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the database file (default `~/.huddle`).
    pub data_dir: Option<PathBuf>,

    /// Maximum time to wait for the database writer lock, in seconds.
    pub busy_timeout_seconds: Option<u64>,

    /// Default slot granularity for newly created rooms, in minutes.
    pub default_slot_minutes: Option<u32>,

    /// Default buffer for newly created rooms, in minutes.
    pub default_buffer_minutes: Option<u32>,
}

impl Config {
    /// Merges `other` over `self`: set fields in `other` win.
    fn merged_with(mut self, other: Self) -> Self {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.busy_timeout_seconds.is_some() {
            self.busy_timeout_seconds = other.busy_timeout_seconds;
        }
        if other.default_slot_minutes.is_some() {
            self.default_slot_minutes = other.default_slot_minutes;
        }
        if other.default_buffer_minutes.is_some() {
            self.default_buffer_minutes = other.default_buffer_minutes;
        }
        self
    }

    /// Reads configuration overrides from `HUDDLE_*` environment
    /// variables. Unparseable numeric values are ignored rather than
    /// fatal; configuration problems should not take the tool down.
    fn from_env() -> Self {
        Self {
            data_dir: env::var_os("HUDDLE_DATA_DIR").map(PathBuf::from),
            busy_timeout_seconds: env::var("HUDDLE_BUSY_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok()),
            default_slot_minutes: env::var("HUDDLE_DEFAULT_SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok()),
            default_buffer_minutes: env::var("HUDDLE_DEFAULT_BUFFER_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Loads a config file, returning the default (empty) config when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

/// Builder merging configuration sources in precedence order.
///
/// # Examples
///
/// ```
/// use huddle::config::{Config, ConfigBuilder};
/// use std::path::PathBuf;
///
/// let overrides = Config {
///     data_dir: Some(PathBuf::from("/tmp/huddle-data")),
///     ..Default::default()
/// };
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(overrides)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/huddle-data")));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    skip_files: bool,
    skip_env: bool,
    config_file: Option<PathBuf>,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder with default behavior: read the user config file
    /// and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips reading configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skips reading environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Reads the given file instead of `~/.huddle/config.yaml`.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Applies programmatic overrides on top of every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Builds the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be read
    /// or parsed.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            let path = self
                .config_file
                .unwrap_or_else(|| crate::database::default_data_dir().join("config.yaml"));
            config = config.merged_with(Config::load_file(&path)?);
        }

        if !self.skip_env {
            config = config.merged_with(Config::from_env());
        }

        if let Some(overrides) = self.overrides {
            config = config.merged_with(overrides);
        }

        Ok(config)
    }
}
