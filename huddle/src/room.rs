//! Room configuration and booking policy types.
//!
//! Rooms are owned by administrators and read-only to the engine: the
//! availability and conflict modules consume a [`Room`] and its embedded
//! [`BookingPolicy`] but never mutate them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A unique identifier for a room.
///
/// # Examples
///
/// ```
/// use huddle::RoomId;
///
/// let id = RoomId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(format!("{id}"), "42");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    /// Creates a room id from its raw database value.
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

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-room booking policy: slot granularity, buffer, duration bounds and
/// the bookable calendar window.
///
/// # Examples
///
/// ```
/// use huddle::BookingPolicy;
///
/// let policy = BookingPolicy::new(30, 0, 30, 240).unwrap();
/// assert_eq!(policy.slot_minutes, 30);
///
/// // Zero-length slots are rejected
/// assert!(BookingPolicy::new(0, 0, 30, 240).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Granularity of the slot grid in minutes (> 0).
    pub slot_minutes: u32,
    /// Quiet time enforced around each booking in minutes (>= 0).
    pub buffer_minutes: u32,
    /// Minimum reservation duration in minutes (>= 1).
    pub min_minutes: u32,
    /// Maximum reservation duration in minutes (>= `min_minutes`).
    pub max_minutes: u32,
    /// First bookable date, if the room opens for booking on a fixed date.
    pub open_from: Option<NaiveDate>,
    /// Last bookable date, if the room stops taking bookings after a date.
    pub open_until: Option<NaiveDate>,
    /// Bookings are accepted at most this many days past "today" (>= 1).
    pub open_days_ahead: u32,
}

impl BookingPolicy {
    /// Default booking horizon when none is configured.
    pub const DEFAULT_OPEN_DAYS_AHEAD: u32 = 30;

    /// Creates a policy with the given core values and no date window.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any bound is out of range.
    pub fn new(
        slot_minutes: u32,
        buffer_minutes: u32,
        min_minutes: u32,
        max_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let policy = Self {
            slot_minutes,
            buffer_minutes,
            min_minutes,
            max_minutes,
            open_from: None,
            open_until: None,
            open_days_ahead: Self::DEFAULT_OPEN_DAYS_AHEAD,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Validates all policy bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.slot_minutes == 0 {
            return Err(ValidationError {
                field: "slot_minutes".into(),
                message: "slot granularity must be at least 1 minute".into(),
            });
        }
        if self.min_minutes == 0 {
            return Err(ValidationError {
                field: "min_minutes".into(),
                message: "minimum duration must be at least 1 minute".into(),
            });
        }
        if self.max_minutes < self.min_minutes {
            return Err(ValidationError {
                field: "max_minutes".into(),
                message: "maximum duration must not be below the minimum".into(),
            });
        }
        if self.open_days_ahead == 0 {
            return Err(ValidationError {
                field: "open_days_ahead".into(),
                message: "booking horizon must be at least 1 day".into(),
            });
        }
        if let (Some(from), Some(until)) = (self.open_from, self.open_until) {
            if from > until {
                return Err(ValidationError {
                    field: "open_from".into(),
                    message: "bookable window start must not be after its end".into(),
                });
            }
        }
        Ok(())
    }
}

/// A meeting room with its booking policy.
///
/// Construct with [`Room::builder`]; the builder trims text fields and
/// validates the policy so invalid rooms never reach storage.
///
/// # Examples
///
/// ```
/// use huddle::{BookingPolicy, Room, RoomId};
///
/// let room = Room::builder(RoomId::new(1), "Boardroom")
///     .location(Some("3F east".to_string()))
///     .capacity(12)
///     .policy(BookingPolicy::new(60, 0, 60, 180).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(room.name(), "Boardroom");
/// assert!(room.active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: String,
    location: Option<String>,
    capacity: u32,
    active: bool,
    policy: BookingPolicy,
}

impl Room {
    /// Creates a new room builder.
    #[must_use]
    pub fn builder(id: RoomId, name: impl Into<String>) -> RoomBuilder {
        RoomBuilder {
            id,
            name: name.into(),
            location: None,
            capacity: 1,
            active: true,
            policy: None,
        }
    }

    /// Returns the room id.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the room name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional location description.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the seating capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns whether the room accepts bookings.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Returns the booking policy.
    #[must_use]
    pub const fn policy(&self) -> &BookingPolicy {
        &self.policy
    }
}

/// Builder for creating [`Room`] instances.
#[derive(Debug)]
pub struct RoomBuilder {
    id: RoomId,
    name: String,
    location: Option<String>,
    capacity: u32,
    active: bool,
    policy: Option<BookingPolicy>,
}

impl RoomBuilder {
    /// Sets the location description. Trimmed; empty becomes `None`.
    #[must_use]
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Sets the seating capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets whether the room accepts bookings.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the booking policy.
    #[must_use]
    pub fn policy(mut self, policy: BookingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the room.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if:
    /// - the name is empty after trimming
    /// - the capacity is zero
    /// - no policy was provided, or the policy fails validation
    pub fn build(self) -> Result<Room, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError {
                field: "name".into(),
                message: "room name must be non-empty after trimming whitespace".into(),
            });
        }
        if self.capacity == 0 {
            return Err(ValidationError {
                field: "capacity".into(),
                message: "capacity must be at least 1".into(),
            });
        }
        let policy = self.policy.ok_or_else(|| ValidationError {
            field: "policy".into(),
            message: "a booking policy is required".into(),
        })?;
        policy.validate()?;

        Ok(Room {
            id: self.id,
            name,
            location: self.location,
            capacity: self.capacity,
            active: self.active,
            policy,
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
