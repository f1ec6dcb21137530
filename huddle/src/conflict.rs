//! Conflict validation for proposed reservations.
//!
//! One validation pipeline serves every caller: the availability engine
//! filters selectable start times through it, and the write path re-runs it
//! inside the insert/update transaction so concurrent bookings cannot slip
//! past each other. Checks run in a fixed order and the first failure wins.

use chrono::NaiveDate;

use crate::error::Error;
use crate::reservation::{Reservation, ReservationId};
use crate::room::BookingPolicy;
use crate::schedule::ResolvedHours;
use crate::time::{overlaps, TimeOfDay};

/// The outcome of validating a proposed reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The proposal passes every check and may be persisted.
    Accept,
    /// The proposal fails; the reason names the first check that failed.
    Reject(RejectReason),
}

impl Decision {
    /// Returns true for [`Decision::Accept`].
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Converts a rejection into the matching [`Error`], using `date` for
    /// the closed-day message. Accept converts to `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the error corresponding to the rejection reason.
    pub fn into_result(self, date: NaiveDate) -> crate::Result<()> {
        match self {
            Self::Accept => Ok(()),
            Self::Reject(reason) => Err(reason.into_error(date)),
        }
    }
}

/// Why a proposed reservation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The duration is outside the room's `[min, max]` bounds.
    DurationOutOfRange {
        /// The requested duration.
        minutes: u32,
        /// The policy minimum.
        min: u32,
        /// The policy maximum.
        max: u32,
    },
    /// The room is closed on the requested date.
    RoomClosed {
        /// Reason carried by a closure override, if any.
        reason: Option<String>,
    },
    /// The interval does not fit inside the operating window.
    OutsideOperatingHours {
        /// The day's open time.
        open: TimeOfDay,
        /// The day's close time.
        close: TimeOfDay,
    },
    /// The start does not land on the slot grid anchored at the open time.
    MisalignedStart {
        /// The room's slot granularity.
        slot_minutes: u32,
    },
    /// The buffered interval overlaps an existing booking's buffered
    /// interval.
    Conflict {
        /// The first blocking reservation found.
        with: ReservationId,
    },
}

impl RejectReason {
    /// Converts the reason into the matching [`Error`].
    #[must_use]
    pub fn into_error(self, date: NaiveDate) -> Error {
        match self {
            Self::DurationOutOfRange { minutes, min, max } => {
                Error::DurationOutOfRange { minutes, min, max }
            }
            Self::RoomClosed { reason } => Error::RoomClosed { date, reason },
            Self::OutsideOperatingHours { open, close } => Error::OutsideOperatingHours {
                open: open.to_string(),
                close: close.to_string(),
            },
            Self::MisalignedStart { slot_minutes } => Error::MisalignedStart { slot_minutes },
            Self::Conflict { with } => Error::Conflict { with },
        }
    }
}

/// Validates a proposed reservation against room policy, the day's
/// resolved operating hours, and the existing reservations for that day.
///
/// Checks, in order (first failure wins):
/// 1. duration within the policy bounds;
/// 2. the day is open and `[start, start+duration)` fits inside the window;
/// 3. the start lands on the slot grid anchored at the open time;
/// 4. the candidate interval, widened by the buffer on both ends, overlaps
///    no existing booked reservation's equally widened interval. Updates
///    pass their own id as `exclude` so a reservation never conflicts with
///    itself. Cancelled reservations never block.
///
/// Pure: no clock, no storage. The write path re-runs this inside its
/// transaction, making the advisory fast path and the authoritative check
/// the same code.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::conflict::{validate, Decision};
/// use huddle::schedule::{DayHours, ResolvedHours};
/// use huddle::{BookingPolicy, TimeOfDay};
///
/// let policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
/// let hours = ResolvedHours {
///     hours: DayHours::open(
///         TimeOfDay::parse("09:00").unwrap(),
///         TimeOfDay::parse("18:00").unwrap(),
///     )
///     .unwrap(),
///     reason: None,
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
///
/// let decision = validate(
///     &policy,
///     &hours,
///     date,
///     TimeOfDay::parse("10:00").unwrap(),
///     60,
///     &[],
///     None,
/// );
/// assert!(decision.is_accept());
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn validate(
    policy: &BookingPolicy,
    hours: &ResolvedHours,
    date: NaiveDate,
    start: TimeOfDay,
    duration_minutes: u32,
    existing: &[Reservation],
    exclude: Option<ReservationId>,
) -> Decision {
    if duration_minutes < policy.min_minutes || duration_minutes > policy.max_minutes {
        return Decision::Reject(RejectReason::DurationOutOfRange {
            minutes: duration_minutes,
            min: policy.min_minutes,
            max: policy.max_minutes,
        });
    }

    let Some((open, close)) = hours.hours.window() else {
        return Decision::Reject(RejectReason::RoomClosed {
            reason: hours.reason.clone(),
        });
    };

    let start_min = i32::from(start.minutes());
    let end_min = start_min + duration_minutes as i32;
    if start_min < i32::from(open.minutes()) || end_min > i32::from(close.minutes()) {
        return Decision::Reject(RejectReason::OutsideOperatingHours { open, close });
    }

    let offset = start.minutes() - open.minutes();
    if u32::from(offset) % policy.slot_minutes != 0 {
        return Decision::Reject(RejectReason::MisalignedStart {
            slot_minutes: policy.slot_minutes,
        });
    }

    let buffer = policy.buffer_minutes as i32;
    let (blocked_start, blocked_end) = (start_min - buffer, end_min + buffer);

    for other in existing {
        if !other.is_booked() {
            continue;
        }
        if exclude == Some(other.id()) {
            continue;
        }
        let (other_start, other_end) = other.minutes_on(date);
        if overlaps(
            blocked_start,
            blocked_end,
            other_start - buffer,
            other_end + buffer,
        ) {
            return Decision::Reject(RejectReason::Conflict { with: other.id() });
        }
    }

    Decision::Accept
}
