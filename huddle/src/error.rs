//! Error types for the huddle library.
//!
//! This module provides a comprehensive error hierarchy for all operations
//! in the huddle library, using `thiserror` for ergonomic error handling.
//! Domain conditions (closed rooms, conflicts, bad durations) are distinct
//! variants so callers can branch on them; infrastructure failures from the
//! storage layer propagate separately via the `Database` variant.

use thiserror::Error;

use crate::reservation::ReservationId;
use crate::room::RoomId;

/// Result type alias for operations that may fail with a huddle error.
///
/// # Examples
///
/// ```
/// use huddle::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(30)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the huddle library.
///
/// This enum encompasses all possible error conditions that can occur
/// while querying availability or managing reservations.
#[derive(Debug, Error)]
pub enum Error {
    /// A wall-clock time string could not be parsed.
    #[error("invalid time {value:?}: {reason}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// The reason the time is invalid.
        reason: String,
    },

    /// Operating hours with `open >= close` were rejected at write time.
    #[error("invalid operating hours: open {open} must be before close {close}")]
    InvalidOperatingHours {
        /// The offending open time, formatted `HH:MM`.
        open: String,
        /// The offending close time, formatted `HH:MM`.
        close: String,
    },

    /// The requested duration falls outside the room's policy bounds.
    #[error("duration {minutes} min is outside the allowed range {min}-{max} min")]
    DurationOutOfRange {
        /// The requested duration in minutes.
        minutes: u32,
        /// The room's minimum duration.
        min: u32,
        /// The room's maximum duration.
        max: u32,
    },

    /// The requested interval does not fit inside the day's operating hours.
    #[error("requested time is outside operating hours ({open} - {close})")]
    OutsideOperatingHours {
        /// The day's open time, formatted `HH:MM`.
        open: String,
        /// The day's close time, formatted `HH:MM`.
        close: String,
    },

    /// The start time does not land on the room's slot grid.
    #[error("start time must align to the {slot_minutes}-minute slot grid")]
    MisalignedStart {
        /// The room's slot granularity.
        slot_minutes: u32,
    },

    /// The room is closed on the requested date.
    #[error("room is closed on {date}{}", .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    RoomClosed {
        /// The requested date.
        date: chrono::NaiveDate,
        /// Optional reason carried by a closure override (holiday name etc.).
        reason: Option<String>,
    },

    /// The requested interval overlaps an existing booking.
    #[error("time conflicts with existing reservation {with}")]
    Conflict {
        /// The id of the blocking reservation.
        with: ReservationId,
    },

    /// The room exists but is not accepting bookings.
    #[error("room {room} is inactive")]
    RoomInactive {
        /// The inactive room.
        room: RoomId,
    },

    /// The requested date is outside the room's bookable window.
    #[error("date is outside the bookable window: {details}")]
    OutsideBookingWindow {
        /// Which bound was violated and where it lies.
        details: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The actor is not allowed to perform this transition.
    #[error("not authorized: {action}")]
    Unauthorized {
        /// The attempted action.
        action: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error indicates a missing room or reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use huddle::Error;
    ///
    /// let err = Error::NotFound { resource: "room 42".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is a booking conflict.
    ///
    /// Conflicts detected by the storage-level re-check surface through the
    /// same variant as the fast-path check, so callers only branch once.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<crate::room::ValidationError> for Error {
    fn from(err: crate::room::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::time::InvalidTimeError> for Error {
    fn from(err: crate::time::InvalidTimeError) -> Self {
        Self::InvalidTime {
            value: err.value,
            reason: err.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_invalid_time_error() {
        let err = Error::InvalidTime {
            value: "25:00".to_string(),
            reason: "hour out of range".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("invalid time"));
        assert!(display.contains("25:00"));
    }

    #[test]
    fn test_invalid_operating_hours_error() {
        let err = Error::InvalidOperatingHours {
            open: "18:00".to_string(),
            close: "09:00".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("open 18:00"));
        assert!(display.contains("close 09:00"));
    }

    #[test]
    fn test_duration_out_of_range_error() {
        let err = Error::DurationOutOfRange {
            minutes: 300,
            min: 30,
            max: 240,
        };
        let display = format!("{err}");
        assert!(display.contains("300"));
        assert!(display.contains("30-240"));
    }

    #[test]
    fn test_room_closed_with_reason() {
        let err = Error::RoomClosed {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            reason: Some("New Year".to_string()),
        };
        let display = format!("{err}");
        assert!(display.contains("2026-01-01"));
        assert!(display.contains("New Year"));
    }

    #[test]
    fn test_room_closed_without_reason() {
        let err = Error::RoomClosed {
            date: NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
            reason: None,
        };
        let display = format!("{err}");
        assert!(display.contains("closed on 2026-01-04"));
        assert!(!display.contains('('));
    }

    #[test]
    fn test_conflict_error() {
        let err = Error::Conflict {
            with: ReservationId::new(7),
        };
        let display = format!("{err}");
        assert!(display.contains("conflicts"));
        assert!(display.contains('7'));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::NotFound {
            resource: "reservation 99".to_string(),
        };
        assert!(err.is_not_found());
        assert!(format!("{err}").contains("reservation 99"));
    }

    #[test]
    fn test_unauthorized_error() {
        let err = Error::Unauthorized {
            action: "cancel reservation 3".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("not authorized"));
        assert!(display.contains("cancel"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "name".to_string(),
            message: "must be non-empty".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("name"));
        assert!(display.contains("must be non-empty"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Err(Error::MisalignedStart { slot_minutes: 30 })
        }

        assert!(returns_result().is_err());
    }
}
