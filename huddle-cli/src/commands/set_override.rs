//! Set-override command implementation.
//!
//! This module implements the `set-override` command, which stores a
//! per-date exception to a room's weekly hours: a closure (holiday,
//! maintenance) or replacement hours for that single date. Overrides win
//! over the weekly schedule when the engine resolves a date.

use clap::Args;

use huddle::output::Envelope;
use huddle::{HoursOverride, RoomId};

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_date, parse_time, print_json, GlobalOptions,
};

/// Set a per-date closure or special hours for a room.
#[derive(Args)]
pub struct SetOverrideCommand {
    /// Room id
    pub room: i64,

    /// The date the override applies to (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Opening time for this date (HH:MM)
    #[arg(long, value_name = "HH:MM", requires = "close", conflicts_with = "closed")]
    pub open: Option<String>,

    /// Closing time for this date (HH:MM)
    #[arg(long, value_name = "HH:MM", requires = "open", conflicts_with = "closed")]
    pub close: Option<String>,

    /// Close the room on this date
    #[arg(long)]
    pub closed: bool,

    /// Reason for a closure, shown on the day view
    #[arg(long, value_name = "TEXT", requires = "closed")]
    pub reason: Option<String>,
}

impl SetOverrideCommand {
    /// Execute the set-override command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;

        let hours_override = match (&self.open, &self.close, self.closed) {
            (_, _, true) => HoursOverride::closed(date, self.reason.clone()),
            (Some(open), Some(close), false) => {
                HoursOverride::special(date, parse_time(open)?, parse_time(close)?)?
            }
            _ => {
                return Err(CliError::InvalidArguments(
                    "give either --closed or both --open and --close".to_string(),
                ))
            }
        };

        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;
        db.set_hours_override(RoomId::new(self.room), &hours_override)?;

        if global.json {
            print_json(&Envelope::ok(&hours_override))?;
        } else if !global.quiet {
            match hours_override.hours.window() {
                Some((open, close)) => {
                    println!("room {}: {date} open {open}-{close}", self.room);
                }
                None => println!("room {}: {date} closed", self.room),
            }
        }

        Ok(())
    }
}
