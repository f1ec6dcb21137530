//! Availability queries: day grid, month calendar, start-time options.
//!
//! Thin glue between the repository and the pure engine. Both the member
//! and the administrator surfaces render from these same queries; there is
//! one slot computation in the system, not one per page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::{self, DayStatus};
use crate::calendar::{self, DayCount, Month};
use crate::database::Database;
use crate::error::Result;
use crate::reservation::ReservationId;
use crate::room::RoomId;
use crate::time::TimeOfDay;

use super::require_active_room;

/// The month calendar for one room: a count per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// The room the summary is for.
    pub room: RoomId,
    /// The month, as `YYYY-MM` in display form.
    pub month: Month,
    /// One entry per day of the month, zero counts included.
    pub days: Vec<DayCount>,
}

/// Computes the free/busy slot grid for a room on a date.
///
/// Loads the room (rejecting unknown and inactive rooms), resolves the
/// day's operating hours (override first, weekly second), loads the day's
/// booked reservations and hands off to [`availability::day_status`].
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] for an unknown room,
/// [`crate::Error::RoomInactive`] for a deactivated one, or a database
/// error.
pub fn day_status(db: &Database, room: RoomId, date: NaiveDate) -> Result<DayStatus> {
    let room = require_active_room(db, room)?;
    let hours = db.hours_for_date(room.id(), date)?;
    let reservations = db.find_by_room_and_date(room.id(), date)?;
    Ok(availability::day_status(
        room.policy(),
        &hours,
        date,
        &reservations,
    ))
}

/// Computes the per-day booking counts for a room over a month.
///
/// Issues one range query for the whole month and buckets in memory
/// ([`calendar::month_counts`]); the cost is proportional to the number of
/// reservations, not to days x reservations.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] for an unknown room,
/// [`crate::Error::RoomInactive`] for a deactivated one, or a database
/// error.
pub fn month_summary(db: &Database, room: RoomId, month: Month) -> Result<MonthSummary> {
    let room = require_active_room(db, room)?;
    let reservations = db.find_by_room_and_month(room.id(), month)?;
    Ok(MonthSummary {
        room: room.id(),
        month,
        days: calendar::month_counts(month, &reservations),
    })
}

/// Computes the bookable start times for a duration on a date.
///
/// Every returned option passes the full conflict validation against the
/// reservations loaded in this call; pass `exclude` when recomputing
/// options while moving an existing reservation.
///
/// # Errors
///
/// Returns [`crate::Error::NotFound`] for an unknown room,
/// [`crate::Error::RoomInactive`] for a deactivated one, or a database
/// error.
pub fn start_time_options(
    db: &Database,
    room: RoomId,
    date: NaiveDate,
    duration_minutes: u32,
    exclude: Option<ReservationId>,
) -> Result<Vec<TimeOfDay>> {
    let room = require_active_room(db, room)?;
    let hours = db.hours_for_date(room.id(), date)?;
    let reservations = db.find_by_room_and_date(room.id(), date)?;
    Ok(availability::start_time_options(
        room.policy(),
        &hours,
        date,
        duration_minutes,
        &reservations,
        exclude,
    ))
}
