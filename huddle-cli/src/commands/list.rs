//! List command implementation.
//!
//! This module implements the `list` command, which shows a user's
//! reservations, newest first. Cancelled reservations are included as
//! history unless `--booked-only` is given.

use std::io::Write;

use clap::Args;

use huddle::output::Envelope;
use huddle::{Reservation, UserId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, print_json, GlobalOptions};

/// List a user's reservations.
#[derive(Args)]
pub struct ListCommand {
    /// User whose reservations to list
    #[arg(long, value_name = "USER", env = "HUDDLE_USER")]
    pub user: i64,

    /// Hide cancelled reservations
    #[arg(long)]
    pub booked_only: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(&config)?;

        let mut reservations = db.list_by_user(UserId::new(self.user))?;
        if self.booked_only {
            reservations.retain(Reservation::is_booked);
        }

        if global.json {
            return print_json(&Envelope::ok(&reservations));
        }

        format_as_table(&reservations)
    }
}

fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "ID\tROOM\tDATE\tSTART\tMIN\tSTATUS\tTITLE")?;
    for r in reservations {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id().value(),
            r.room().value(),
            r.start_at().date(),
            r.start_at().format("%H:%M"),
            r.duration_minutes(),
            r.status(),
            r.title().unwrap_or("-"),
        )?;
    }

    Ok(())
}
