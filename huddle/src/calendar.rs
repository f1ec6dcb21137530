//! Month view aggregation: per-day reservation counts.
//!
//! The calendar widget only needs one number per day. The aggregator takes
//! the month's reservations in a single list (one range query, see
//! [`crate::database`]) and buckets them in one pass, so the cost is
//! O(reservations), not O(days x reservations).

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;

/// A calendar month (`YYYY-MM`).
///
/// # Examples
///
/// ```
/// use huddle::calendar::Month;
///
/// let month = Month::parse("2026-08").unwrap();
/// assert_eq!(month.to_string(), "2026-08");
/// assert_eq!(month.days().count(), 31);
/// assert_eq!(month.next().to_string(), "2026-09");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1-12.
    pub month: u32,
}

impl Month {
    /// Creates a month, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns a message if `month` is outside 1..=12 or the year has no
    /// first day in chrono's range.
    pub fn new(year: i32, month: u32) -> Result<Self, String> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(format!("invalid month {year}-{month:02}"));
        }
        Ok(Self { year, month })
    }

    /// Parses a `YYYY-MM` string.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the input is not a month.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("invalid month {s:?}: expected YYYY-MM"))?;
        let year: i32 = y
            .parse()
            .map_err(|_| format!("invalid month {s:?}: bad year"))?;
        let month: u32 = m
            .parse()
            .map_err(|_| format!("invalid month {s:?}: bad month"))?;
        Self::new(year, month)
    }

    /// Returns the month containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the first day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated at construction")
    }

    /// Returns the following month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Iterates every date of the month in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        let end = self.next().first_day();
        std::iter::successors(Some(first), move |d| {
            let next = *d + Duration::days(1);
            (next < end).then_some(next)
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The reservation count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// The date.
    pub date: NaiveDate,
    /// Number of booked reservations whose interval intersects the date.
    pub count: u32,
}

/// Buckets a month's reservations into per-day counts.
///
/// Every day of the month appears in the output, zero counts included, in
/// calendar order. A reservation is counted on each day its
/// `[start, end)` interval intersects, so a row crossing midnight shows up
/// on both days. Cancelled reservations are skipped.
///
/// # Examples
///
/// ```
/// use huddle::calendar::{month_counts, Month};
///
/// let month = Month::parse("2026-08").unwrap();
/// let counts = month_counts(month, &[]);
/// assert_eq!(counts.len(), 31);
/// assert!(counts.iter().all(|d| d.count == 0));
/// ```
#[must_use]
pub fn month_counts(month: Month, reservations: &[Reservation]) -> Vec<DayCount> {
    let first = month.first_day();
    let end = month.next().first_day();
    let days = (end - first).num_days();
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let mut counts = vec![0u32; days as usize];

    for r in reservations {
        if !r.is_booked() {
            continue;
        }
        // Clamp the touched date range to the month, then bump each day.
        let start_date = r.start_at().date().max(first);
        let last_date = last_touched_date(r).min(end - Duration::days(1));
        let mut d = start_date;
        while d <= last_date {
            let index = (d - first).num_days();
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            if index >= 0 {
                counts[index as usize] += 1;
            }
            d += Duration::days(1);
        }
    }

    first
        .iter_days()
        .take_while(|d| *d < end)
        .zip(counts)
        .map(|(date, count)| DayCount { date, count })
        .collect()
}

/// The last calendar date a reservation's half-open interval touches.
fn last_touched_date(r: &Reservation) -> NaiveDate {
    let end = r.end_at();
    let end_date = end.date();
    // An end exactly at midnight belongs to the previous day (half-open).
    if end.time() == chrono::NaiveTime::MIN {
        end_date - Duration::days(1)
    } else {
        end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{ReservationId, ReservationStatus, UserId};
    use crate::room::RoomId;
    use crate::Reservation;

    fn booked(id: i64, date: (i32, u32, u32), hm: (u32, u32), duration: u32) -> Reservation {
        Reservation::builder(
            ReservationId::new(id),
            RoomId::new(1),
            UserId::new(1),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(hm.0, hm.1, 0)
                .unwrap(),
            duration,
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_month_parse_and_display() {
        let m = Month::parse("2026-08").unwrap();
        assert_eq!((m.year, m.month), (2026, 8));
        assert_eq!(m.to_string(), "2026-08");

        assert!(Month::parse("2026-13").is_err());
        assert!(Month::parse("2026").is_err());
        assert!(Month::parse("aug 2026").is_err());
    }

    #[test]
    fn test_month_next_wraps_year() {
        assert_eq!(Month::new(2026, 12).unwrap().next(), Month::new(2027, 1).unwrap());
        assert_eq!(Month::new(2026, 1).unwrap().next(), Month::new(2026, 2).unwrap());
    }

    #[test]
    fn test_month_days() {
        assert_eq!(Month::new(2026, 2).unwrap().days().count(), 28);
        assert_eq!(Month::new(2024, 2).unwrap().days().count(), 29);
        assert_eq!(Month::new(2026, 8).unwrap().days().count(), 31);
    }

    #[test]
    fn test_empty_month_all_zero() {
        let counts = month_counts(Month::new(2026, 8).unwrap(), &[]);
        assert_eq!(counts.len(), 31);
        assert!(counts.iter().all(|d| d.count == 0));
        assert_eq!(counts[0].date, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(counts[30].date, NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
    }

    #[test]
    fn test_counts_bucket_by_day() {
        let rs = [
            booked(1, (2026, 8, 3), (10, 0), 60),
            booked(2, (2026, 8, 3), (14, 0), 30),
            booked(3, (2026, 8, 10), (9, 0), 120),
        ];
        let counts = month_counts(Month::new(2026, 8).unwrap(), &rs);
        assert_eq!(counts[2].count, 2); // Aug 3
        assert_eq!(counts[9].count, 1); // Aug 10
        let total: u32 = counts.iter().map(|d| d.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_cancelled_not_counted() {
        let mut r = booked(1, (2026, 8, 3), (10, 0), 60);
        r = Reservation::builder(r.id(), r.room(), r.user(), r.start_at(), 60)
            .status(ReservationStatus::Cancelled)
            .build()
            .unwrap();
        let counts = month_counts(Month::new(2026, 8).unwrap(), &[r]);
        assert!(counts.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_midnight_spanning_counted_on_both_days() {
        let r = booked(1, (2026, 8, 3), (23, 30), 60);
        let counts = month_counts(Month::new(2026, 8).unwrap(), &[r]);
        assert_eq!(counts[2].count, 1); // Aug 3
        assert_eq!(counts[3].count, 1); // Aug 4
    }

    #[test]
    fn test_end_at_midnight_stays_on_one_day() {
        // 23:00 + 60min ends exactly at midnight; half-open, so only Aug 3.
        let r = booked(1, (2026, 8, 3), (23, 0), 60);
        let counts = month_counts(Month::new(2026, 8).unwrap(), &[r]);
        assert_eq!(counts[2].count, 1);
        assert_eq!(counts[3].count, 0);
    }

    #[test]
    fn test_sum_equals_reservations_when_none_span() {
        let rs: Vec<Reservation> = (1..=10)
            .map(|i| booked(i, (2026, 8, u32::try_from(i).unwrap()), (10, 0), 60))
            .collect();
        let counts = month_counts(Month::new(2026, 8).unwrap(), &rs);
        let total: u32 = counts.iter().map(|d| d.count).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_reservation_outside_month_clamped_away() {
        // A July reservation contributes nothing to August.
        let r = booked(1, (2026, 7, 31), (10, 0), 60);
        let counts = month_counts(Month::new(2026, 8).unwrap(), &[r]);
        assert!(counts.iter().all(|d| d.count == 0));
    }
}
