//! Day availability: the slot grid and selectable start times.
//!
//! These are pure functions over a room's policy, the day's resolved
//! operating hours, and the reservations already loaded for that day. The
//! repository round trip happens in [`crate::operations::status`]; nothing
//! here touches storage or the clock, so the output is deterministic for a
//! given input and trivially testable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::{self, Decision};
use crate::reservation::{Reservation, ReservationId};
use crate::room::BookingPolicy;
use crate::schedule::ResolvedHours;
use crate::time::{overlaps, TimeOfDay};

/// Whether a slot is free or taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SlotState {
    /// No reservation touches the slot.
    Free,
    /// A reservation covers (part of) the slot.
    Busy {
        /// The occupying reservation.
        reservation: ReservationId,
        /// Its title, for display.
        title: Option<String>,
    },
}

/// One cell of the day's timetable: a half-open minute interval tagged
/// free or busy.
///
/// Slots are derived data, regenerated on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot start (inclusive).
    pub start: TimeOfDay,
    /// Slot end (exclusive). The trailing slot may end before a full step
    /// when the window length is not a multiple of the granularity.
    pub end: TimeOfDay,
    /// Free/busy tag.
    #[serde(flatten)]
    pub state: SlotState,
}

/// The availability picture for one room on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayStatus {
    /// The room does not operate on this date.
    Closed {
        /// Reason carried by a closure override, if any.
        reason: Option<String>,
    },
    /// The room operates; the grid covers `[open, close)`.
    Open {
        /// Opening time.
        open: TimeOfDay,
        /// Closing time.
        close: TimeOfDay,
        /// Slot granularity used to build the grid.
        slot_minutes: u32,
        /// The slot grid, in order, tiling the window exactly.
        slots: Vec<Slot>,
        /// The booked reservations the grid was computed from.
        reservations: Vec<Reservation>,
    },
}

impl DayStatus {
    /// Returns true for the closed variant.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// Computes the slot grid for a room on a date.
///
/// Walks the operating window from open to close in `slot_minutes` steps;
/// each slot ends at `min(step_end, close)`, so a window that is not an
/// exact multiple of the granularity keeps its shorter trailing slot. A
/// slot is busy if any booked reservation's raw interval overlaps it; the
/// first overlapping reservation wins and supplies the display title
/// (overlapping bookings are a data anomaly the grid reports rather than
/// reconciles). The grid always holds `ceil((close-open)/slot)` slots and
/// tiles `[open, close)` without gaps.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::availability::{day_status, DayStatus};
/// use huddle::schedule::{DayHours, ResolvedHours};
/// use huddle::{BookingPolicy, TimeOfDay};
///
/// let policy = BookingPolicy::new(60, 0, 60, 240).unwrap();
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
/// let DayStatus::Open { slots, .. } = day_status(&policy, &hours, date, &[]) else {
///     panic!("expected open day");
/// };
/// assert_eq!(slots.len(), 9);
/// ```
#[must_use]
pub fn day_status(
    policy: &BookingPolicy,
    hours: &ResolvedHours,
    date: NaiveDate,
    reservations: &[Reservation],
) -> DayStatus {
    let Some((open, close)) = hours.hours.window() else {
        return DayStatus::Closed {
            reason: hours.reason.clone(),
        };
    };

    let booked: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.is_booked())
        .cloned()
        .collect();

    let intervals: Vec<(ReservationId, Option<String>, i32, i32)> = booked
        .iter()
        .map(|r| {
            let (s, e) = r.minutes_on(date);
            (r.id(), r.title().map(String::from), s, e)
        })
        .collect();

    let mut slots = Vec::new();
    let mut t = u32::from(open.minutes());
    while t < u32::from(close.minutes()) {
        let end = (t + policy.slot_minutes).min(u32::from(close.minutes()));

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let hit = intervals
            .iter()
            .find(|(_, _, s, e)| overlaps(t as i32, end as i32, *s, *e));

        let state = match hit {
            Some((id, title, _, _)) => SlotState::Busy {
                reservation: *id,
                title: title.clone(),
            },
            None => SlotState::Free,
        };

        #[allow(clippy::cast_possible_truncation)]
        slots.push(Slot {
            start: TimeOfDay::try_from(t as u16).expect("slot start stays below close"),
            end: TimeOfDay::try_from(end as u16).expect("slot end stays below 24:00"),
            state,
        });
        t = end;
    }

    DayStatus::Open {
        open,
        close,
        slot_minutes: policy.slot_minutes,
        slots,
        reservations: booked,
    }
}

/// Computes the bookable start times for a duration on a date.
///
/// Candidates are the slot-aligned times `open + k * slot` for which the
/// full duration still fits before close; each candidate is then pushed
/// through [`conflict::validate`] against the same reservation set, so
/// every offered option is bookable at the instant it was computed: the
/// returned list contains `t` exactly when `validate` would accept `t`.
///
/// Returns an empty list when the day is closed or the duration does not
/// fit anywhere in the window.
#[must_use]
pub fn start_time_options(
    policy: &BookingPolicy,
    hours: &ResolvedHours,
    date: NaiveDate,
    duration_minutes: u32,
    reservations: &[Reservation],
    exclude: Option<ReservationId>,
) -> Vec<TimeOfDay> {
    let Some((open, close)) = hours.hours.window() else {
        return Vec::new();
    };

    let mut options = Vec::new();
    let mut t = u32::from(open.minutes());
    while t + duration_minutes <= u32::from(close.minutes()) {
        #[allow(clippy::cast_possible_truncation)]
        let start = TimeOfDay::try_from(t as u16).expect("candidate stays below close");
        let decision = conflict::validate(
            policy,
            hours,
            date,
            start,
            duration_minutes,
            reservations,
            exclude,
        );
        if decision == Decision::Accept {
            options.push(start);
        }
        t += policy.slot_minutes;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{ReservationStatus, UserId};
    use crate::room::RoomId;
    use crate::schedule::DayHours;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
    }

    fn hours(open: &str, close: &str) -> ResolvedHours {
        ResolvedHours {
            hours: DayHours::open(t(open), t(close)).unwrap(),
            reason: None,
        }
    }

    fn policy(slot: u32, buffer: u32) -> BookingPolicy {
        BookingPolicy::new(slot, buffer, 30, 240).unwrap()
    }

    fn booked(id: i64, start: &str, duration: u32) -> Reservation {
        Reservation::builder(
            ReservationId::new(id),
            RoomId::new(1),
            UserId::new(1),
            date().and_time(chrono::NaiveTime::parse_from_str(start, "%H:%M").unwrap()),
            duration,
        )
        .title(Some(format!("meeting {id}")))
        .build()
        .unwrap()
    }

    #[test]
    fn test_closed_day() {
        let resolved = ResolvedHours {
            hours: DayHours::Closed,
            reason: Some("Holiday".to_string()),
        };
        let status = day_status(&policy(60, 0), &resolved, date(), &[]);
        assert_eq!(
            status,
            DayStatus::Closed {
                reason: Some("Holiday".to_string())
            }
        );
    }

    #[test]
    fn test_empty_day_all_free() {
        let status = day_status(&policy(60, 0), &hours("09:00", "18:00"), date(), &[]);
        let DayStatus::Open { slots, open, close, slot_minutes, .. } = status else {
            panic!("expected open");
        };
        assert_eq!(open, t("09:00"));
        assert_eq!(close, t("18:00"));
        assert_eq!(slot_minutes, 60);
        assert_eq!(slots.len(), 9);
        assert!(slots.iter().all(|s| s.state == SlotState::Free));
    }

    #[test]
    fn test_slots_tile_window() {
        let status = day_status(&policy(60, 0), &hours("09:00", "18:00"), date(), &[]);
        let DayStatus::Open { slots, .. } = status else {
            panic!("expected open");
        };
        assert_eq!(slots[0].start, t("09:00"));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(slots.last().unwrap().end, t("18:00"));
    }

    #[test]
    fn test_trailing_partial_slot() {
        // 09:00-18:30 with 60-minute slots: ten slots, the last one short.
        let status = day_status(&policy(60, 0), &hours("09:00", "18:30"), date(), &[]);
        let DayStatus::Open { slots, .. } = status else {
            panic!("expected open");
        };
        assert_eq!(slots.len(), 10);
        let last = slots.last().unwrap();
        assert_eq!(last.start, t("18:00"));
        assert_eq!(last.end, t("18:30"));
    }

    #[test]
    fn test_busy_slot_carries_title() {
        let existing = [booked(11, "10:00", 60)];
        let status = day_status(&policy(60, 0), &hours("09:00", "18:00"), date(), &existing);
        let DayStatus::Open { slots, .. } = status else {
            panic!("expected open");
        };

        assert_eq!(slots[0].state, SlotState::Free);
        assert_eq!(
            slots[1].state,
            SlotState::Busy {
                reservation: ReservationId::new(11),
                title: Some("meeting 11".to_string()),
            }
        );
        assert_eq!(slots[2].state, SlotState::Free);
    }

    #[test]
    fn test_reservation_spanning_multiple_slots() {
        let existing = [booked(11, "10:00", 90)];
        let status = day_status(&policy(30, 0), &hours("09:00", "18:00"), date(), &existing);
        let DayStatus::Open { slots, .. } = status else {
            panic!("expected open");
        };

        let busy: Vec<bool> = slots
            .iter()
            .map(|s| matches!(s.state, SlotState::Busy { .. }))
            .collect();
        // 10:00, 10:30, 11:00 busy; everything else free.
        assert_eq!(busy.iter().filter(|b| **b).count(), 3);
        assert!(busy[2] && busy[3] && busy[4]);
    }

    #[test]
    fn test_cancelled_reservation_ignored() {
        let cancelled = Reservation::builder(
            ReservationId::new(11),
            RoomId::new(1),
            UserId::new(1),
            date().and_hms_opt(10, 0, 0).unwrap(),
            60,
        )
        .status(ReservationStatus::Cancelled)
        .build()
        .unwrap();

        let status =
            day_status(&policy(60, 0), &hours("09:00", "18:00"), date(), &[cancelled]);
        let DayStatus::Open { slots, reservations, .. } = status else {
            panic!("expected open");
        };
        assert!(slots.iter().all(|s| s.state == SlotState::Free));
        assert!(reservations.is_empty());
    }

    #[test]
    fn test_options_full_empty_day() {
        let options = start_time_options(
            &policy(60, 0),
            &hours("09:00", "18:00"),
            date(),
            60,
            &[],
            None,
        );
        assert_eq!(options.len(), 9);
        assert_eq!(options[0], t("09:00"));
        assert_eq!(options[8], t("17:00"));
    }

    #[test]
    fn test_options_respect_duration_fit() {
        // close 18:00, duration 90: the last start offered is 16:30.
        let options = start_time_options(
            &policy(30, 0),
            &hours("09:00", "18:00"),
            date(),
            90,
            &[],
            None,
        );
        assert_eq!(options.last().copied(), Some(t("16:30")));
        assert!(!options.contains(&t("17:00")));
    }

    #[test]
    fn test_options_exclude_conflicts() {
        let existing = [booked(11, "10:00", 60)];
        let options = start_time_options(
            &policy(60, 0),
            &hours("09:00", "18:00"),
            date(),
            60,
            &existing,
            None,
        );
        assert!(!options.contains(&t("10:00")));
        assert!(options.contains(&t("09:00")));
        assert!(options.contains(&t("11:00")));
    }

    #[test]
    fn test_options_empty_when_duration_too_long() {
        let options = start_time_options(
            &policy(60, 0),
            &hours("09:00", "10:00"),
            date(),
            240,
            &[],
            None,
        );
        assert!(options.is_empty());
    }

    #[test]
    fn test_options_empty_on_closed_day() {
        let resolved = ResolvedHours {
            hours: DayHours::Closed,
            reason: None,
        };
        let options = start_time_options(&policy(60, 0), &resolved, date(), 60, &[], None);
        assert!(options.is_empty());
    }

    #[test]
    fn test_options_agree_with_validate() {
        // Every aligned candidate in the window: offered iff accepted.
        let p = policy(30, 10);
        let h = hours("09:00", "13:00");
        let existing = [booked(11, "10:00", 60), booked(12, "11:30", 30)];
        let duration = 60;

        let options = start_time_options(&p, &h, date(), duration, &existing, None);

        let mut m = u32::from(t("09:00").minutes());
        while m + duration <= u32::from(t("13:00").minutes()) {
            let start = TimeOfDay::try_from(u16::try_from(m).unwrap()).unwrap();
            let accepted = crate::conflict::validate(
                &p,
                &h,
                date(),
                start,
                duration,
                &existing,
                None,
            )
            .is_accept();
            assert_eq!(options.contains(&start), accepted, "start {start}");
            m += p.slot_minutes;
        }
    }
}
