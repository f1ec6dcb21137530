//! Day command implementation.
//!
//! This module implements the `day` command, which renders a room's
//! free/busy slot grid for a date.

use std::io::Write;

use clap::Args;

use huddle::availability::{DayStatus, SlotState};
use huddle::operations;
use huddle::output::Envelope;
use huddle::RoomId;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_date, print_json, today, GlobalOptions};

/// Show a room's free/busy slot grid for a date.
#[derive(Args)]
pub struct DayCommand {
    /// Room id
    pub room: i64,

    /// The date to show (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

impl DayCommand {
    /// Execute the day command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = match &self.date {
            Some(s) => parse_date(s)?,
            None => today(),
        };

        let config = load_configuration(global)?;
        let db = open_database(&config)?;
        let status = operations::day_status(&db, RoomId::new(self.room), date)?;

        if global.json {
            return print_json(&Envelope::ok(&status));
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        match &status {
            DayStatus::Closed { reason } => match reason {
                Some(reason) => writeln!(handle, "room {} closed on {date} ({reason})", self.room)?,
                None => writeln!(handle, "room {} closed on {date}", self.room)?,
            },
            DayStatus::Open {
                open,
                close,
                slot_minutes,
                slots,
                ..
            } => {
                writeln!(
                    handle,
                    "room {} on {date}: {open}-{close}, {slot_minutes} min slots",
                    self.room
                )?;
                for slot in slots {
                    match &slot.state {
                        SlotState::Free => {
                            writeln!(handle, "  {}-{}  free", slot.start, slot.end)?;
                        }
                        SlotState::Busy { reservation, title } => {
                            let title = title.as_deref().unwrap_or("busy");
                            writeln!(
                                handle,
                                "  {}-{}  {title} (#{})",
                                slot.start,
                                slot.end,
                                reservation.value()
                            )?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
