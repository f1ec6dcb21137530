//! Month command implementation.
//!
//! This module implements the `month` command, which shows how booked
//! each day of a month is for one room. Days without reservations are
//! omitted from the human output but kept in the JSON payload.

use std::io::Write;

use clap::Args;

use huddle::operations;
use huddle::output::Envelope;
use huddle::{Month, RoomId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_month, print_json, today, GlobalOptions};

/// Show a room's per-day booking counts for a month.
#[derive(Args)]
pub struct MonthCommand {
    /// Room id
    pub room: i64,

    /// The month to show (YYYY-MM, default: current month)
    #[arg(long, value_name = "MONTH")]
    pub month: Option<String>,
}

impl MonthCommand {
    /// Execute the month command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let month = match &self.month {
            Some(s) => parse_month(s)?,
            None => Month::of(today()),
        };

        let config = load_configuration(global)?;
        let db = open_database(&config)?;
        let summary = operations::month_summary(&db, RoomId::new(self.room), month)?;

        if global.json {
            return print_json(&Envelope::ok(&summary));
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        let total: u32 = summary.days.iter().map(|d| d.count).sum();
        writeln!(handle, "room {} in {month}: {total} bookings", self.room)?;
        for day in summary.days.iter().filter(|d| d.count > 0) {
            writeln!(handle, "  {}  {}", day.date, day.count)?;
        }

        Ok(())
    }
}
