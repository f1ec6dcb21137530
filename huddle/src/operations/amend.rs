//! The amend operation: move or retitle an existing reservation.
//!
//! The same validation ladder as booking, with the reservation's own id
//! excluded from the conflict check so a booking never collides with
//! itself. Cancelled reservations are terminal and cannot be amended.

use chrono::{NaiveDate, NaiveDateTime};

use crate::conflict;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId};
use crate::time::TimeOfDay;

use super::book::start_datetime;
use super::{check_booking_window, require_active_room, Actor};

/// A request to amend a booked reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmendRequest {
    /// The reservation to amend.
    pub reservation: ReservationId,
    /// The new title (replaces the old one; `None` clears it).
    pub title: Option<String>,
    /// The new date.
    pub date: NaiveDate,
    /// The new start time; must land on the room's slot grid.
    pub start: TimeOfDay,
    /// The new duration in minutes.
    pub duration_minutes: u32,
}

/// Amends a booked reservation, returning the updated record.
///
/// The owner or an administrator may amend; the reservation must still be
/// booked. Validation re-runs in full against the target date, and the
/// database re-checks conflicts (excluding this reservation) inside the
/// update transaction.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown reservation,
/// [`Error::Unauthorized`] for a foreign one, [`Error::Validation`] for a
/// cancelled one, any of the booking validation errors, or a database
/// error.
pub fn amend(
    db: &mut Database,
    actor: &Actor,
    request: &AmendRequest,
    now: NaiveDateTime,
) -> Result<Reservation> {
    let current = db
        .get_reservation(request.reservation)?
        .ok_or_else(|| Error::NotFound {
            resource: format!("reservation {}", request.reservation),
        })?;

    if !actor.may_manage(current.user()) {
        return Err(Error::Unauthorized {
            action: format!("amend reservation {}", current.id()),
        });
    }
    if !current.is_booked() {
        return Err(Error::Validation {
            field: "status".into(),
            message: "cancelled reservations cannot be amended".into(),
        });
    }

    let room = require_active_room(db, current.room())?;
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
        Some(current.id()),
    )
    .into_result(request.date)?;

    let start_at = start_datetime(request.date, request.start);
    db.update_interval(
        current.id(),
        request.title.as_deref(),
        start_at,
        request.duration_minutes,
        room.policy().buffer_minutes,
        &actor.to_string(),
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use crate::operations::{book, BookRequest};
    use crate::reservation::UserId;
    use crate::room::{BookingPolicy, Room, RoomId};
    use crate::schedule::{DayHours, WeekSchedule};
    use tempfile::tempdir;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    fn weekday_room(db: &mut Database) -> RoomId {
        let room = Room::builder(RoomId::new(0), "Boardroom")
            .capacity(8)
            .policy(BookingPolicy::new(30, 0, 30, 240).unwrap())
            .build()
            .unwrap();
        let id = db.create_room(&room).unwrap().id();

        let mut schedule = WeekSchedule::closed();
        for dow in 1..=5 {
            schedule
                .set(dow, DayHours::open(t("09:00"), t("18:00")).unwrap())
                .unwrap();
        }
        db.set_week_schedule(id, &schedule).unwrap();
        id
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
    }

    fn now() -> NaiveDateTime {
        monday().and_hms_opt(8, 0, 0).unwrap()
    }

    fn booked(db: &mut Database, room: RoomId, user: i64, start: &str) -> Reservation {
        let actor = Actor::Member(UserId::new(user));
        book(
            db,
            &actor,
            &BookRequest {
                room,
                user: UserId::new(user),
                title: Some("sync".to_string()),
                date: monday(),
                start: t(start),
                duration_minutes: 60,
            },
            now(),
        )
        .unwrap()
    }

    fn amend_to(reservation: ReservationId, start: &str, duration: u32) -> AmendRequest {
        AmendRequest {
            reservation,
            title: Some("moved".to_string()),
            date: monday(),
            start: t(start),
            duration_minutes: duration,
        }
    }

    #[test]
    fn test_owner_amends_own_reservation() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");

        let actor = Actor::Member(UserId::new(7));
        let moved = amend(&mut db, &actor, &amend_to(r.id(), "14:00", 90), now()).unwrap();

        assert_eq!(moved.start_at(), monday().and_hms_opt(14, 0, 0).unwrap());
        assert_eq!(moved.duration_minutes(), 90);
        assert_eq!(moved.title(), Some("moved"));
    }

    #[test]
    fn test_foreign_member_rejected() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");

        let actor = Actor::Member(UserId::new(8));
        let err = amend(&mut db, &actor, &amend_to(r.id(), "14:00", 60), now()).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn test_admin_amends_any_reservation() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");

        let actor = Actor::Admin(UserId::new(1));
        assert!(amend(&mut db, &actor, &amend_to(r.id(), "14:00", 60), now()).is_ok());
    }

    #[test]
    fn test_amend_within_own_window_allowed() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");

        // Shifting half a slot into its own old interval must pass.
        let actor = Actor::Member(UserId::new(7));
        assert!(amend(&mut db, &actor, &amend_to(r.id(), "10:30", 60), now()).is_ok());
    }

    #[test]
    fn test_amend_into_other_booking_conflicts() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let first = booked(&mut db, room, 7, "10:00");
        let second = booked(&mut db, room, 7, "12:00");

        let actor = Actor::Member(UserId::new(7));
        let err =
            amend(&mut db, &actor, &amend_to(second.id(), "10:30", 60), now()).unwrap_err();
        assert!(matches!(err, Error::Conflict { with } if with == first.id()));
    }

    #[test]
    fn test_amend_cancelled_rejected() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");
        db.cancel_reservation(r.id(), "user 7", now()).unwrap();

        let actor = Actor::Member(UserId::new(7));
        let err = amend(&mut db, &actor, &amend_to(r.id(), "14:00", 60), now()).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_amend_unknown_reservation() {
        let (_dir, mut db) = open_db();
        weekday_room(&mut db);

        let actor = Actor::Member(UserId::new(7));
        let err = amend(
            &mut db,
            &actor,
            &amend_to(ReservationId::new(99), "14:00", 60),
            now(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_amend_validates_hours() {
        let (_dir, mut db) = open_db();
        let room = weekday_room(&mut db);
        let r = booked(&mut db, room, 7, "10:00");

        let actor = Actor::Member(UserId::new(7));
        let err = amend(&mut db, &actor, &amend_to(r.id(), "17:30", 60), now()).unwrap_err();
        assert!(matches!(err, Error::OutsideOperatingHours { .. }));
    }
}
