#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # huddle
//!
//! A library for managing meeting-room reservations.
//!
//! huddle answers three questions about a shared room: which slots of a day
//! are free or busy, how booked each day of a month is, and whether a
//! proposed reservation is allowed to exist. The availability and conflict
//! logic is pure; persistence lives behind a `SQLite`-backed repository and
//! the lifecycle operations tie the two together.
//!
//! ## Core Types
//!
//! - [`TimeOfDay`] and [`time::overlaps`]: minute-of-day arithmetic
//! - [`Room`], [`BookingPolicy`], [`WeekSchedule`]: room configuration
//! - [`Reservation`] and [`ReservationStatus`]: booking records
//! - [`availability::day_status`] and [`conflict::validate`]: the engine
//! - [`Database`]: the repository
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use huddle::{BookingPolicy, TimeOfDay};
//!
//! // Parse a wall-clock time
//! let start = TimeOfDay::parse("09:30").unwrap();
//! assert_eq!(start.minutes(), 570);
//!
//! // Policies validate their bounds
//! let policy = BookingPolicy::new(30, 10, 30, 240).unwrap();
//! assert_eq!(policy.buffer_minutes, 10);
//! ```

pub mod availability;
pub mod calendar;
pub mod conflict;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod output;
pub mod reservation;
pub mod room;
pub mod schedule;
pub mod time;

// Re-export key types at crate root for convenience
pub use availability::{DayStatus, Slot, SlotState};
pub use calendar::{month_counts, DayCount, Month};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{Actor, AmendRequest, BookRequest, MonthSummary};
pub use reservation::{Reservation, ReservationId, ReservationStatus, UserId};
pub use room::{BookingPolicy, Room, RoomId, ValidationError};
pub use schedule::{DayHours, HoursOverride, WeekSchedule};
pub use time::TimeOfDay;
