//! Cancel command implementation.
//!
//! This module implements the `cancel` command, which releases a booked
//! reservation's interval. The record survives as history; cancelling is
//! terminal.

use clap::Args;

use huddle::output::Envelope;
use huddle::{operations, ReservationId};

use crate::error::CliError;
use crate::utils::{actor, load_configuration, now, open_database, print_json, GlobalOptions};

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    pub reservation: i64,

    /// Acting user id
    #[arg(long, value_name = "USER", env = "HUDDLE_USER")]
    pub user: i64,

    /// Act with administrator authority
    #[arg(long)]
    pub admin: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;

        let reservation = operations::cancel(
            &mut db,
            &actor(self.user, self.admin),
            ReservationId::new(self.reservation),
            now(),
        )?;

        if global.json {
            print_json(&Envelope::ok_with_message(&reservation, "cancelled"))?;
        } else if !global.quiet {
            println!("cancelled reservation {}", reservation.id());
        }

        Ok(())
    }
}
