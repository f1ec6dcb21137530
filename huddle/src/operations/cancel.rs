//! The cancel operation: release a reservation's interval.
//!
//! `Booked -> Cancelled` is the only transition in the lifecycle and it is
//! terminal. The row survives as history; the slot frees immediately for
//! subsequent validation and booking.

use chrono::NaiveDateTime;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId};

use super::Actor;

/// Cancels a booked reservation, returning the cancelled record.
///
/// The owner or an administrator may cancel. Cancelling an already
/// cancelled reservation fails: the transition out of `Booked` happens at
/// most once.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown or already cancelled
/// reservation, [`Error::Unauthorized`] for a foreign one, or a database
/// error.
pub fn cancel(
    db: &mut Database,
    actor: &Actor,
    id: ReservationId,
    now: NaiveDateTime,
) -> Result<Reservation> {
    let current = db.get_reservation(id)?.ok_or_else(|| Error::NotFound {
        resource: format!("reservation {id}"),
    })?;

    if !actor.may_manage(current.user()) {
        return Err(Error::Unauthorized {
            action: format!("cancel reservation {id}"),
        });
    }

    db.cancel_reservation(id, &actor.to_string(), now)
}
