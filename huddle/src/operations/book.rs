//! The book operation: create a reservation.
//!
//! Runs the full validation ladder (actor authority, room state, bookable
//! window, operating hours, slot alignment, conflicts), then hands the
//! insert to the database, whose in-transaction re-check arbitrates races
//! between concurrent bookings.

use chrono::{NaiveDate, NaiveDateTime};

use crate::conflict;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, UserId};
use crate::room::RoomId;
use crate::time::TimeOfDay;

use super::{check_booking_window, require_active_room, Actor};

/// A request to book a room.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::{BookRequest, RoomId, TimeOfDay, UserId};
///
/// let request = BookRequest {
///     room: RoomId::new(1),
///     user: UserId::new(7),
///     title: Some("Design review".to_string()),
///     date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
///     start: TimeOfDay::parse("10:00").unwrap(),
///     duration_minutes: 60,
/// };
/// assert_eq!(request.duration_minutes, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRequest {
    /// The room to book.
    pub room: RoomId,
    /// The user the reservation is for.
    pub user: UserId,
    /// Optional title shown on the timetable.
    pub title: Option<String>,
    /// The date of the reservation.
    pub date: NaiveDate,
    /// The start time; must land on the room's slot grid.
    pub start: TimeOfDay,
    /// The duration in minutes.
    pub duration_minutes: u32,
}

/// Books a room, returning the stored reservation.
///
/// Members book for themselves; administrators may book on behalf of any
/// user. `now` supplies both the audit timestamp and "today" for the
/// bookable-window check.
///
/// # Errors
///
/// Returns the first failing check as an [`Error`]:
/// [`Error::Unauthorized`], [`Error::NotFound`], [`Error::RoomInactive`],
/// [`Error::OutsideBookingWindow`], [`Error::DurationOutOfRange`],
/// [`Error::RoomClosed`], [`Error::OutsideOperatingHours`],
/// [`Error::MisalignedStart`] or [`Error::Conflict`], or a database
/// error from the write itself.
pub fn book(
    db: &mut Database,
    actor: &Actor,
    request: &BookRequest,
    now: NaiveDateTime,
) -> Result<Reservation> {
    if !actor.may_manage(request.user) {
        return Err(Error::Unauthorized {
            action: format!("book room {} for {}", request.room, request.user),
        });
    }

    let room = require_active_room(db, request.room)?;
    check_booking_window(room.policy(), request.date, now.date())?;

    let hours = db.hours_for_date(room.id(), request.date)?;
    let existing = db.find_by_room_and_date(room.id(), request.date)?;

    conflict::validate(
        room.policy(),
        &hours,
        request.date,
        request.start,
        request.duration_minutes,
        &existing,
        None,
    )
    .into_result(request.date)?;

    let start_at = start_datetime(request.date, request.start);
    db.create_reservation(
        room.id(),
        request.user,
        request.title.as_deref(),
        start_at,
        request.duration_minutes,
        room.policy().buffer_minutes,
        &actor.to_string(),
        now,
    )
}

pub(super) fn start_datetime(date: NaiveDate, start: TimeOfDay) -> NaiveDateTime {
    let minutes = start.minutes();
    date.and_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .expect("minute-of-day is always a valid wall-clock time")
}
