//! Options command implementation.
//!
//! This module implements the `options` command, which lists the start
//! times at which a reservation of the given duration could be booked on
//! a date. Every printed time would be accepted by `book` against the
//! reservations visible at the time of the query.

use clap::Args;

use huddle::operations;
use huddle::output::Envelope;
use huddle::{ReservationId, RoomId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_date, print_json, today, GlobalOptions};

/// Show the bookable start times for a duration on a date.
#[derive(Args)]
pub struct OptionsCommand {
    /// Room id
    pub room: i64,

    /// The date to query (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Desired duration in minutes
    #[arg(long, value_name = "MINUTES")]
    pub duration: u32,

    /// Ignore this reservation when checking conflicts (when moving it)
    #[arg(long, value_name = "ID")]
    pub exclude: Option<i64>,
}

impl OptionsCommand {
    /// Execute the options command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = match &self.date {
            Some(s) => parse_date(s)?,
            None => today(),
        };

        let config = load_configuration(global)?;
        let db = open_database(&config)?;
        let options = operations::start_time_options(
            &db,
            RoomId::new(self.room),
            date,
            self.duration,
            self.exclude.map(ReservationId::new),
        )?;

        if global.json {
            return print_json(&Envelope::ok(&options));
        }

        // One option per line, shell-friendly
        for option in &options {
            println!("{option}");
        }
        if options.is_empty() && !global.quiet {
            eprintln!(
                "no {} min start times free in room {} on {date}",
                self.duration, self.room
            );
        }

        Ok(())
    }
}
