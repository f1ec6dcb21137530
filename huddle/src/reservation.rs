//! Reservation records and their status lifecycle.
//!
//! A reservation is an interval of room time owned by a user. Records are
//! never deleted: cancellation flips the status to `Cancelled` and the row
//! stays behind as part of the audit trail.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::room::{RoomId, ValidationError};

/// A unique identifier for a reservation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Creates a reservation id from its raw database value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a user, supplied by the identity collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user id from its raw value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The status of a reservation.
///
/// The only transition is `Booked -> Cancelled`; a cancelled reservation is
/// terminal and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// The reservation holds its time interval.
    Booked,
    /// The reservation was cancelled and no longer blocks the room.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "BOOKED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses the storage representation.
    ///
    /// # Errors
    ///
    /// Returns the unrecognized input on failure.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "BOOKED" => Ok(Self::Booked),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A room reservation.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::{Reservation, ReservationId, RoomId, UserId};
///
/// let start = NaiveDate::from_ymd_opt(2026, 8, 3)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
///
/// let reservation = Reservation::builder(
///     ReservationId::new(1),
///     RoomId::new(1),
///     UserId::new(7),
///     start,
///     60,
/// )
/// .title(Some("Design review".to_string()))
/// .build()
/// .unwrap();
///
/// assert_eq!(reservation.end_at(), start + chrono::Duration::minutes(60));
/// assert!(reservation.is_booked());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    room: RoomId,
    user: UserId,
    title: Option<String>,
    start_at: NaiveDateTime,
    duration_minutes: u32,
    status: ReservationStatus,
    created_at: NaiveDateTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    ///
    /// `start_at` is truncated to the minute; sub-minute precision never
    /// reaches storage or the overlap math.
    #[must_use]
    pub fn builder(
        id: ReservationId,
        room: RoomId,
        user: UserId,
        start_at: NaiveDateTime,
        duration_minutes: u32,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id,
            room,
            user,
            title: None,
            start_at,
            duration_minutes,
            status: ReservationStatus::Booked,
            created_at: None,
        }
    }

    /// Returns the reservation id.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the reserved room.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the optional title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    /// Returns the duration in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Returns the end timestamp (`start_at + duration`).
    #[must_use]
    pub fn end_at(&self) -> NaiveDateTime {
        self.start_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns true while the reservation still blocks the room.
    #[must_use]
    pub fn is_booked(&self) -> bool {
        self.status == ReservationStatus::Booked
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Returns the reservation interval in minutes relative to midnight of
    /// `date`, for overlap math against that day's slot grid.
    ///
    /// A reservation starting before `date` yields a negative start; one
    /// running past the day's end exceeds 1440. Both compare correctly
    /// against in-day intervals with [`crate::time::overlaps`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn minutes_on(&self, date: NaiveDate) -> (i32, i32) {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let start = (self.start_at - midnight).num_minutes() as i32;
        (start, start + self.duration_minutes as i32)
    }

    /// Returns true if the reservation interval intersects the calendar day.
    #[must_use]
    pub fn intersects_date(&self, date: NaiveDate) -> bool {
        let (start, end) = self.minutes_on(date);
        crate::time::overlaps(start, end, 0, i32::from(crate::time::MINUTES_PER_DAY))
    }
}

/// Builder for creating [`Reservation`] instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: ReservationId,
    room: RoomId,
    user: UserId,
    title: Option<String>,
    start_at: NaiveDateTime,
    duration_minutes: u32,
    status: ReservationStatus,
    created_at: Option<NaiveDateTime>,
}

impl ReservationBuilder {
    /// Sets the title. Trimmed; empty becomes `None`.
    #[must_use]
    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the duration is zero.
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.duration_minutes == 0 {
            return Err(ValidationError {
                field: "duration_minutes".into(),
                message: "duration must be at least 1 minute".into(),
            });
        }

        let start_at = truncate_to_minute(self.start_at);
        Ok(Reservation {
            id: self.id,
            room: self.room,
            user: self.user,
            title: self.title,
            start_at,
            duration_minutes: self.duration_minutes,
            status: self.status,
            created_at: truncate_to_minute(self.created_at.unwrap_or(start_at)),
        })
    }
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}
