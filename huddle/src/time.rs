//! Clock-time primitives for the slot grid.
//!
//! This module provides the minute-of-day type used throughout the engine,
//! the half-open interval overlap test, and the single canonical conversion
//! from a calendar date to a day-of-week index. Every consumer of day-of-week
//! numbering goes through [`weekday_index`]; no call site derives its own.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time expressed as minutes since midnight (0-1439).
///
/// # Examples
///
/// ```
/// use huddle::TimeOfDay;
///
/// let t = TimeOfDay::parse("09:30").unwrap();
/// assert_eq!(t.minutes(), 570);
/// assert_eq!(t.to_string(), "09:30");
///
/// // 24:00 and beyond are rejected
/// assert!(TimeOfDay::parse("24:00").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, the first minute of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// Parses a `HH:MM` string into a time of day.
    ///
    /// Accepts hours 0-23 and minutes 0-59; a single-digit hour is allowed
    /// (`9:00`), matching what users type. Anything else is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `HH:MM` or a component is out
    /// of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use huddle::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse("00:00").unwrap().minutes(), 0);
    /// assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes(), 1439);
    /// assert!(TimeOfDay::parse("12:60").is_err());
    /// assert!(TimeOfDay::parse("noon").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidTimeError> {
        let invalid = |reason: &str| InvalidTimeError {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (hh, mm) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| invalid("expected HH:MM"))?;
        if mm.len() != 2 || hh.is_empty() || hh.len() > 2 {
            return Err(invalid("expected HH:MM"));
        }

        let hour: u16 = hh.parse().map_err(|_| invalid("hour is not a number"))?;
        let minute: u16 = mm.parse().map_err(|_| invalid("minute is not a number"))?;

        if hour > 23 {
            return Err(invalid("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(invalid("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Returns the minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Returns the time of day of a timestamp, discarding seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(at: NaiveDateTime) -> Self {
        Self((at.hour() * 60 + at.minute()) as u16)
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = InvalidTimeError;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        if minutes < MINUTES_PER_DAY {
            Ok(Self(minutes))
        } else {
            Err(InvalidTimeError {
                value: minutes.to_string(),
                reason: format!("minute-of-day must be below {MINUTES_PER_DAY}"),
            })
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Error type for malformed wall-clock times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeError {
    /// The rejected input.
    pub value: String,
    /// The reason the input is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time {:?}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidTimeError {}

/// Tests whether two half-open minute intervals `[a_start, a_end)` and
/// `[b_start, b_end)` overlap.
///
/// Back-to-back intervals (one ending exactly where the other starts) do
/// not overlap. Arguments are signed so that buffered intervals may extend
/// before midnight or past the end of the day without wrapping.
///
/// # Examples
///
/// ```
/// use huddle::time::overlaps;
///
/// assert!(overlaps(600, 660, 630, 690));
/// assert!(!overlaps(600, 660, 660, 720)); // adjacent
/// assert!(overlaps(-10, 20, 0, 5)); // buffered past midnight
/// ```
#[must_use]
pub const fn overlaps(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && a_end > b_start
}

/// Converts a calendar date to the day-of-week index used by operating-hour
/// schedules: 1 = Monday .. 7 = Sunday (ISO-8601).
///
/// This is the only date-to-weekday conversion in the crate; schedules,
/// queries and the CLI all number days through this function.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::time::weekday_index;
///
/// // 2026-08-03 is a Monday
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()), 1);
/// // 2026-08-09 is a Sunday
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 8, 9).unwrap()), 7);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Overlap is symmetric in its two intervals.
        #[test]
        fn overlap_symmetric(
            a in 0i32..1440, al in 1i32..300,
            b in 0i32..1440, bl in 1i32..300,
        ) {
            prop_assert_eq!(
                overlaps(a, a + al, b, b + bl),
                overlaps(b, b + bl, a, a + al)
            );
        }

        // Adjacent intervals never overlap, in either order.
        #[test]
        fn adjacency_never_overlaps(start in 0i32..1440, len in 1i32..300) {
            prop_assert!(!overlaps(start, start + len, start + len, start + len + 30));
            prop_assert!(!overlaps(start + len, start + len + 30, start, start + len));
        }

        // overlaps() agrees with the mathematical definition of
        // non-empty intersection of half-open intervals.
        #[test]
        fn overlap_matches_intersection(
            a in 0i32..1440, al in 1i32..300,
            b in 0i32..1440, bl in 1i32..300,
        ) {
            let (a_end, b_end) = (a + al, b + bl);
            let intersects = a.max(b) < a_end.min(b_end);
            prop_assert_eq!(overlaps(a, a_end, b, b_end), intersects);
        }

        // Parse/display round-trips every valid minute of the day.
        #[test]
        fn parse_display_roundtrip(m in 0u16..1440) {
            let t = TimeOfDay::try_from(m).unwrap();
            prop_assert_eq!(TimeOfDay::parse(&t.to_string()).unwrap(), t);
        }
    }
}
