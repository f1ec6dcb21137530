//! Amend command implementation.
//!
//! This module implements the `amend` command, which moves an existing
//! booked reservation to a new date, time or duration and replaces its
//! title. The reservation's own interval never counts as a conflict.

use clap::Args;

use huddle::output::Envelope;
use huddle::{operations, AmendRequest, ReservationId};

use crate::error::CliError;
use crate::utils::{
    actor, load_configuration, now, open_database, parse_date, parse_time, print_json,
    GlobalOptions,
};

/// Move or retitle an existing reservation.
#[derive(Args)]
pub struct AmendCommand {
    /// Reservation id
    pub reservation: i64,

    /// Acting user id
    #[arg(long, value_name = "USER", env = "HUDDLE_USER")]
    pub user: i64,

    /// Act with administrator authority
    #[arg(long)]
    pub admin: bool,

    /// The new date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// The new start time (HH:MM), on the room's slot grid
    #[arg(long, value_name = "HH:MM")]
    pub start: String,

    /// The new duration in minutes
    #[arg(long, value_name = "MINUTES")]
    pub duration: u32,

    /// The new title (omitting clears the old one)
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

impl AmendCommand {
    /// Execute the amend command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let request = AmendRequest {
            reservation: ReservationId::new(self.reservation),
            title: self.title,
            date: parse_date(&self.date)?,
            start: parse_time(&self.start)?,
            duration_minutes: self.duration,
        };

        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;
        let reservation =
            operations::amend(&mut db, &actor(self.user, self.admin), &request, now())?;

        if global.json {
            print_json(&Envelope::ok_with_message(&reservation, "amended"))?;
        } else if !global.quiet {
            println!(
                "reservation {} moved to {} {}-{}",
                reservation.id(),
                reservation.start_at().date(),
                reservation.start_at().format("%H:%M"),
                reservation.end_at().format("%H:%M")
            );
        }

        Ok(())
    }
}
