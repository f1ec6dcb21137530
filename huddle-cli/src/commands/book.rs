//! Book command implementation.
//!
//! This module implements the `book` command, which creates a
//! reservation. Members book for themselves; with `--admin` the acting
//! user may book on behalf of another user via `--for`.

use clap::Args;

use huddle::output::Envelope;
use huddle::{operations, BookRequest, RoomId, UserId};

use crate::error::CliError;
use crate::utils::{
    actor, load_configuration, now, open_database, parse_date, parse_time, print_json,
    GlobalOptions,
};

/// Book a room.
#[derive(Args)]
pub struct BookCommand {
    /// Room id
    pub room: i64,

    /// Acting user id
    #[arg(long, value_name = "USER", env = "HUDDLE_USER")]
    pub user: i64,

    /// Act with administrator authority
    #[arg(long)]
    pub admin: bool,

    /// Book on behalf of this user (requires --admin)
    #[arg(long = "for", value_name = "USER", requires = "admin")]
    pub for_user: Option<i64>,

    /// The date to book (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Start time (HH:MM), on the room's slot grid
    #[arg(long, value_name = "HH:MM")]
    pub start: String,

    /// Duration in minutes
    #[arg(long, value_name = "MINUTES")]
    pub duration: u32,

    /// Title shown on the timetable
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let request = BookRequest {
            room: RoomId::new(self.room),
            user: UserId::new(self.for_user.unwrap_or(self.user)),
            title: self.title,
            date: parse_date(&self.date)?,
            start: parse_time(&self.start)?,
            duration_minutes: self.duration,
        };

        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;
        let reservation =
            operations::book(&mut db, &actor(self.user, self.admin), &request, now())?;

        if global.json {
            print_json(&Envelope::ok_with_message(&reservation, "booked"))?;
        } else {
            // Just the id, shell-friendly
            println!("{}", reservation.id().value());
            if !global.quiet {
                eprintln!(
                    "Booked room {} on {} {}-{} (reservation {})",
                    reservation.room(),
                    reservation.start_at().date(),
                    reservation.start_at().format("%H:%M"),
                    reservation.end_at().format("%H:%M"),
                    reservation.id()
                );
            }
        }

        Ok(())
    }
}
