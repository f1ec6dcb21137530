//! Utility functions for CLI operations.
//!
//! This module provides common helpers used across CLI commands:
//! configuration loading, database opening, argument parsing for dates
//! and times, and JSON envelope output.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use huddle::database::default_data_dir;
use huddle::output::Envelope;
use huddle::{Actor, Config, ConfigBuilder, Database, DatabaseConfig, Month, TimeOfDay, UserId};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Emit results as a JSON envelope instead of human-readable text.
    pub json: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables (`HUDDLE_*`)
/// 3. The user configuration file
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let overrides = Config {
        data_dir: global.data_dir.clone(),
        busy_timeout_seconds: global.busy_timeout.map(u64::from),
        ..Default::default()
    };

    ConfigBuilder::new()
        .with_config(overrides)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the database named by the configuration.
///
/// The database file lives at `<data_dir>/huddle.db`, defaulting to
/// `~/.huddle/huddle.db`; the file and its directory are created on first
/// use.
pub fn open_database(config: &Config) -> Result<Database, CliError> {
    let data_dir = config.data_dir.clone().unwrap_or_else(default_data_dir);

    let mut db_config = DatabaseConfig::new(data_dir.join("huddle.db"));
    if let Some(seconds) = config.busy_timeout_seconds {
        db_config = db_config.with_busy_timeout(std::time::Duration::from_secs(seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// The acting user for a lifecycle command: an administrator when the
/// `--admin` flag is set, a regular member otherwise.
pub fn actor(user: i64, admin: bool) -> Actor {
    if admin {
        Actor::Admin(UserId::new(user))
    } else {
        Actor::Member(UserId::new(user))
    }
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CliError::InvalidArguments(format!("expected a YYYY-MM-DD date, got {s:?}")))
}

/// Parse an `HH:MM` time argument.
pub fn parse_time(s: &str) -> Result<TimeOfDay, CliError> {
    TimeOfDay::parse(s).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

/// Parse a `YYYY-MM` month argument.
pub fn parse_month(s: &str) -> Result<Month, CliError> {
    Month::parse(s).map_err(CliError::InvalidArguments)
}

/// The current local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The current local timestamp, for audit rows and window checks.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Write a JSON envelope to stdout.
pub fn print_json<T: Serialize>(envelope: &Envelope<T>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(envelope)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    println!("{json}");
    Ok(())
}
