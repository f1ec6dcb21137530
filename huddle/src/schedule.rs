//! Weekly operating-hour schedules and per-date overrides.
//!
//! Each room carries one [`DayHours`] entry per day of week (1 = Monday ..
//! 7 = Sunday, see [`crate::time::weekday_index`]); a missing or unset entry
//! reads as closed. A [`HoursOverride`] replaces the weekly entry for one
//! specific date, which is how holiday closures and special hours are
//! configured. Resolution is always override first, weekly second.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::TimeOfDay;

/// Operating hours for a single day: either closed, or open over a
/// half-open wall-clock window.
///
/// The `open < close` invariant is enforced at construction, so a stored
/// `Open` entry is always a non-empty window.
///
/// # Examples
///
/// ```
/// use huddle::{DayHours, TimeOfDay};
///
/// let open = TimeOfDay::parse("09:00").unwrap();
/// let close = TimeOfDay::parse("18:00").unwrap();
/// let hours = DayHours::open(open, close).unwrap();
/// assert!(!hours.is_closed());
///
/// // Inverted windows are rejected, never stored
/// assert!(DayHours::open(close, open).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayHours {
    /// The room is closed all day.
    Closed,
    /// The room is open from `open` (inclusive) to `close` (exclusive).
    Open {
        /// Opening time.
        open: TimeOfDay,
        /// Closing time; always after `open`.
        close: TimeOfDay,
    },
}

impl DayHours {
    /// Creates an open entry, enforcing `open < close`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperatingHours`] if `open >= close`.
    pub fn open(open: TimeOfDay, close: TimeOfDay) -> Result<Self> {
        if open < close {
            Ok(Self::Open { open, close })
        } else {
            Err(Error::InvalidOperatingHours {
                open: open.to_string(),
                close: close.to_string(),
            })
        }
    }

    /// Returns true for the closed variant.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the `(open, close)` window, or `None` when closed.
    #[must_use]
    pub const fn window(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match self {
            Self::Closed => None,
            Self::Open { open, close } => Some((*open, *close)),
        }
    }
}

/// A room's weekly operating schedule: one [`DayHours`] per day of week.
///
/// Days are indexed 1 = Monday .. 7 = Sunday. Every day starts out closed;
/// administrators open days explicitly.
///
/// # Examples
///
/// ```
/// use huddle::{DayHours, TimeOfDay, WeekSchedule};
///
/// let open = TimeOfDay::parse("09:00").unwrap();
/// let close = TimeOfDay::parse("18:00").unwrap();
///
/// let mut schedule = WeekSchedule::closed();
/// for dow in 1..=5 {
///     schedule.set(dow, DayHours::open(open, close).unwrap()).unwrap();
/// }
///
/// assert!(!schedule.hours_on(3).is_closed()); // Wednesday
/// assert!(schedule.hours_on(6).is_closed());  // Saturday
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    days: [DayHours; 7],
}

impl WeekSchedule {
    /// Creates a schedule with every day closed.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            days: [DayHours::Closed; 7],
        }
    }

    /// Sets the hours for a day of week (1 = Monday .. 7 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `dow` is outside 1..=7.
    pub fn set(&mut self, dow: u8, hours: DayHours) -> Result<()> {
        let index = Self::index(dow)?;
        self.days[index] = hours;
        Ok(())
    }

    /// Returns the hours for a day of week, treating out-of-range indices
    /// as closed (the total accessor the availability engine relies on).
    #[must_use]
    pub fn hours_on(&self, dow: u8) -> DayHours {
        match Self::index(dow) {
            Ok(index) => self.days[index],
            Err(_) => DayHours::Closed,
        }
    }

    /// Iterates `(dow, hours)` pairs Monday through Sunday.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u8, DayHours)> + '_ {
        self.days
            .iter()
            .enumerate()
            .map(|(i, h)| ((i + 1) as u8, *h))
    }

    fn index(dow: u8) -> Result<usize> {
        if (1..=7).contains(&dow) {
            Ok(usize::from(dow) - 1)
        } else {
            Err(Error::Validation {
                field: "dow".into(),
                message: format!("day of week must be 1-7 (Monday-Sunday), got {dow}"),
            })
        }
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::closed()
    }
}

/// A per-date replacement for the weekly schedule entry.
///
/// Overrides model holiday closures (`hours: Closed` with a reason) and
/// one-off special hours. They win over the weekly entry when resolving the
/// hours for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursOverride {
    /// The date this override applies to.
    pub date: NaiveDate,
    /// The hours in force on that date.
    pub hours: DayHours,
    /// Optional human-readable reason (holiday name, maintenance, ...).
    pub reason: Option<String>,
}

impl HoursOverride {
    /// Creates a closure override with an optional reason.
    #[must_use]
    pub fn closed(date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            date,
            hours: DayHours::Closed,
            reason: reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
        }
    }

    /// Creates a special-hours override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperatingHours`] if `open >= close`.
    pub fn special(date: NaiveDate, open: TimeOfDay, close: TimeOfDay) -> Result<Self> {
        Ok(Self {
            date,
            hours: DayHours::open(open, close)?,
            reason: None,
        })
    }
}

/// Resolves the operating hours for a date: the override for that exact
/// date if present, otherwise the weekly entry for the date's day of week.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use huddle::schedule::{resolve_hours, DayHours, HoursOverride, WeekSchedule};
/// use huddle::TimeOfDay;
///
/// let mut weekly = WeekSchedule::closed();
/// weekly
///     .set(1, DayHours::open(
///         TimeOfDay::parse("09:00").unwrap(),
///         TimeOfDay::parse("18:00").unwrap(),
///     ).unwrap())
///     .unwrap();
///
/// let holiday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(); // a Monday
/// let overrides = [HoursOverride::closed(holiday, Some("Summer break".into()))];
///
/// let resolved = resolve_hours(&weekly, &overrides, holiday);
/// assert!(resolved.hours.is_closed());
/// assert_eq!(resolved.reason.as_deref(), Some("Summer break"));
/// ```
#[must_use]
pub fn resolve_hours(
    weekly: &WeekSchedule,
    overrides: &[HoursOverride],
    date: NaiveDate,
) -> ResolvedHours {
    if let Some(ov) = overrides.iter().find(|ov| ov.date == date) {
        return ResolvedHours {
            hours: ov.hours,
            reason: ov.reason.clone(),
        };
    }
    ResolvedHours {
        hours: weekly.hours_on(crate::time::weekday_index(date)),
        reason: None,
    }
}

/// The outcome of resolving hours for a date: the effective [`DayHours`]
/// plus the override reason when an override supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHours {
    /// The effective hours for the date.
    pub hours: DayHours,
    /// Reason carried by the override, if one applied.
    pub reason: Option<String>,
}
