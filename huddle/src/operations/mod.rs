//! Reservation lifecycle operations and availability queries.
//!
//! This layer ties the pure engine to the repository: status queries load
//! room configuration and reservations, then hand off to
//! [`crate::availability`]; the booking operations run the full validation
//! ladder and let the database's conflict-checked writes arbitrate races.
//! Every operation takes the acting user and the current time explicitly;
//! nothing in the library reads the clock, which keeps the behavior
//! deterministic under test.

mod amend;
mod book;
mod cancel;
mod status;

pub use amend::{amend, AmendRequest};
pub use book::{book, BookRequest};
pub use cancel::cancel;
pub use status::{day_status, month_summary, start_time_options, MonthSummary};

use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::reservation::UserId;
use crate::room::{BookingPolicy, Room, RoomId};

use crate::database::Database;

/// The acting user, as supplied by the external identity collaborator.
///
/// Administrators may manage any reservation; members only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A regular member.
    Member(UserId),
    /// An administrator.
    Admin(UserId),
}

impl Actor {
    /// Returns the acting user's id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::Member(id) | Self::Admin(id) => *id,
        }
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// Returns true if the actor may manage a reservation owned by `owner`.
    #[must_use]
    pub fn may_manage(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id() == owner
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(id) => write!(f, "user {id}"),
            Self::Admin(id) => write!(f, "admin {id}"),
        }
    }
}

/// Loads a room or reports it missing.
pub(crate) fn require_room(db: &Database, id: RoomId) -> Result<Room> {
    db.get_room(id)?.ok_or_else(|| Error::NotFound {
        resource: format!("room {id}"),
    })
}

/// Loads a room and rejects inactive ones; bookings and status queries
/// both refuse rooms that were switched off.
pub(crate) fn require_active_room(db: &Database, id: RoomId) -> Result<Room> {
    let room = require_room(db, id)?;
    if !room.active() {
        return Err(Error::RoomInactive { room: id });
    }
    Ok(room)
}

/// Checks the bookable calendar window: no past dates, within the room's
/// fixed date bounds, and at most `open_days_ahead` past today.
pub(crate) fn check_booking_window(
    policy: &BookingPolicy,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    if date < today {
        return Err(Error::OutsideBookingWindow {
            details: "past dates cannot be booked".to_string(),
        });
    }
    if let Some(from) = policy.open_from {
        if date < from {
            return Err(Error::OutsideBookingWindow {
                details: format!("room opens for booking on {from}"),
            });
        }
    }
    if let Some(until) = policy.open_until {
        if date > until {
            return Err(Error::OutsideBookingWindow {
                details: format!("room takes bookings through {until}"),
            });
        }
    }
    let horizon = today + chrono::Duration::days(i64::from(policy.open_days_ahead));
    if date > horizon {
        return Err(Error::OutsideBookingWindow {
            details: format!(
                "bookings open {} days ahead (through {horizon})",
                policy.open_days_ahead
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_actor_authority() {
        let owner = UserId::new(7);
        let member = Actor::Member(owner);
        let other = Actor::Member(UserId::new(8));
        let admin = Actor::Admin(UserId::new(1));

        assert!(member.may_manage(owner));
        assert!(!other.may_manage(owner));
        assert!(admin.may_manage(owner));
        assert!(admin.is_admin());
        assert!(!member.is_admin());
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(Actor::Member(UserId::new(7)).to_string(), "user 7");
        assert_eq!(Actor::Admin(UserId::new(1)).to_string(), "admin 1");
    }

    #[test]
    fn test_window_rejects_past() {
        let policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
        let err =
            check_booking_window(&policy, d(2026, 8, 2), d(2026, 8, 3)).unwrap_err();
        assert!(matches!(err, Error::OutsideBookingWindow { .. }));
    }

    #[test]
    fn test_window_today_allowed() {
        let policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
        assert!(check_booking_window(&policy, d(2026, 8, 3), d(2026, 8, 3)).is_ok());
    }

    #[test]
    fn test_window_horizon() {
        let mut policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
        policy.open_days_ahead = 7;

        assert!(check_booking_window(&policy, d(2026, 8, 10), d(2026, 8, 3)).is_ok());
        let err =
            check_booking_window(&policy, d(2026, 8, 11), d(2026, 8, 3)).unwrap_err();
        assert!(matches!(err, Error::OutsideBookingWindow { .. }));
    }

    #[test]
    fn test_window_fixed_bounds() {
        let mut policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
        policy.open_from = Some(d(2026, 8, 10));
        policy.open_until = Some(d(2026, 8, 20));
        policy.open_days_ahead = 365;

        assert!(check_booking_window(&policy, d(2026, 8, 9), d(2026, 8, 3)).is_err());
        assert!(check_booking_window(&policy, d(2026, 8, 10), d(2026, 8, 3)).is_ok());
        assert!(check_booking_window(&policy, d(2026, 8, 20), d(2026, 8, 3)).is_ok());
        assert!(check_booking_window(&policy, d(2026, 8, 21), d(2026, 8, 3)).is_err());
    }
}
