//! Common test utilities for CLI integration tests.
//!
//! Provides an isolated test environment (temporary data directory) and
//! helpers for the setup steps most tests share: adding a room, opening
//! its week, and booking a slot.

use std::path::PathBuf;

use assert_cmd::Command;
use chrono::{Days, Local, NaiveDate};
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the huddle data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with its own data directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("huddle-data");
        Self { temp_dir, data_dir }
    }

    /// Get a command builder with the data directory pre-configured and
    /// ambient `HUDDLE_*` variables cleared.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("huddle").expect("Failed to find huddle binary");
        cmd.env_remove("HUDDLE_DATA_DIR")
            .env_remove("HUDDLE_USER")
            .env_remove("HUDDLE_BUSY_TIMEOUT")
            .arg("--data-dir")
            .arg(&self.data_dir);
        cmd
    }

    /// Add a room with default policy (30 min slots, no buffer) and
    /// return its id.
    pub fn add_room(&self, name: &str) -> i64 {
        let output = self
            .command()
            .arg("--quiet")
            .arg("add-room")
            .arg(name)
            .output()
            .expect("Failed to run add-room");

        assert!(
            output.status.success(),
            "add-room failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("Output is not a room id")
    }

    /// Open a room 09:00-18:00 on every day of the week.
    pub fn open_all_week(&self, room: i64) {
        self.command()
            .arg("--quiet")
            .arg("set-hours")
            .arg(room.to_string())
            .arg("--dow")
            .arg("1,2,3,4,5,6,7")
            .arg("--open")
            .arg("09:00")
            .arg("--close")
            .arg("18:00")
            .assert()
            .success();
    }

    /// Book a slot and return the reservation id.
    pub fn book(&self, room: i64, user: i64, date: &str, start: &str, duration: u32) -> i64 {
        let output = self
            .command()
            .arg("--quiet")
            .arg("book")
            .arg(room.to_string())
            .arg("--user")
            .arg(user.to_string())
            .arg("--date")
            .arg(date)
            .arg("--start")
            .arg(start)
            .arg("--duration")
            .arg(duration.to_string())
            .output()
            .expect("Failed to run book");

        assert!(
            output.status.success(),
            "book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("Output is not a reservation id")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Tomorrow's date, safely inside the default 30-day booking horizon.
#[allow(dead_code)]
pub fn tomorrow() -> String {
    tomorrow_date().format("%Y-%m-%d").to_string()
}

/// Tomorrow as a `NaiveDate`.
#[allow(dead_code)]
pub fn tomorrow_date() -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .expect("tomorrow exists")
}
