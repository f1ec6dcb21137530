//! Set-hours command implementation.
//!
//! This module implements the `set-hours` command, which rewrites one or
//! more days of a room's weekly operating schedule. The remaining days
//! keep their stored hours.

use clap::Args;

use huddle::output::Envelope;
use huddle::{DayHours, RoomId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_time, print_json, GlobalOptions};

/// Set a room's weekly operating hours for one or more days of week.
#[derive(Args)]
pub struct SetHoursCommand {
    /// Room id
    pub room: i64,

    /// Days of week to set (1=Monday .. 7=Sunday), comma-separated
    #[arg(long, value_name = "DOW", value_delimiter = ',', required = true)]
    pub dow: Vec<u8>,

    /// Opening time (HH:MM)
    #[arg(long, value_name = "HH:MM", requires = "close", conflicts_with = "closed")]
    pub open: Option<String>,

    /// Closing time (HH:MM)
    #[arg(long, value_name = "HH:MM", requires = "open", conflicts_with = "closed")]
    pub close: Option<String>,

    /// Mark the days closed instead of giving hours
    #[arg(long)]
    pub closed: bool,
}

impl SetHoursCommand {
    /// Execute the set-hours command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let hours = match (&self.open, &self.close, self.closed) {
            (_, _, true) => DayHours::Closed,
            (Some(open), Some(close), false) => {
                DayHours::open(parse_time(open)?, parse_time(close)?)?
            }
            _ => {
                return Err(CliError::InvalidArguments(
                    "give either --closed or both --open and --close".to_string(),
                ))
            }
        };

        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;
        let room = RoomId::new(self.room);

        let mut schedule = db.get_week_schedule(room)?;
        for dow in &self.dow {
            schedule.set(*dow, hours)?;
        }
        db.set_week_schedule(room, &schedule)?;

        if global.json {
            print_json(&Envelope::ok(&schedule))?;
        } else if !global.quiet {
            let days = self
                .dow
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            match hours.window() {
                Some((open, close)) => {
                    println!("room {}: dow {days} open {open}-{close}", self.room);
                }
                None => println!("room {}: dow {days} closed", self.room),
            }
        }

        Ok(())
    }
}
