//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `add-room`: Add a room with its booking policy
//! - `rooms`: List configured rooms (optionally with their schedules)
//! - `set-hours`: Set a room's weekly operating hours
//! - `set-override`: Set a per-date closure or special hours
//! - `day`: Show the free/busy slot grid for a date
//! - `month`: Show per-day booking counts for a month
//! - `options`: Show bookable start times for a duration
//! - `book`: Book a room
//! - `amend`: Move or retitle an existing reservation
//! - `cancel`: Cancel a reservation
//! - `list`: List a user's reservations
//! - `completions`: Generate shell completion scripts

pub mod add_room;
pub mod amend;
pub mod book;
pub mod cancel;
pub mod completions;
pub mod day;
pub mod list;
pub mod month;
pub mod options;
pub mod rooms;
pub mod set_hours;
pub mod set_override;

pub use add_room::AddRoomCommand;
pub use amend::AmendCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use completions::CompletionsCommand;
pub use day::DayCommand;
pub use list::ListCommand;
pub use month::MonthCommand;
pub use options::OptionsCommand;
pub use rooms::RoomsCommand;
pub use set_hours::SetHoursCommand;
pub use set_override::SetOverrideCommand;
