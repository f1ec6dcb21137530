//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AddRoomCommand, AmendCommand, BookCommand, CancelCommand, CompletionsCommand, DayCommand,
    ListCommand, MonthCommand, OptionsCommand, RoomsCommand, SetHoursCommand,
    SetOverrideCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for managing meeting-room reservations.
#[derive(Parser)]
#[command(name = "huddle")]
#[command(version, about = "Manage meeting-room reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Emit results as JSON ({ok, message, data} envelope)
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "HUDDLE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "HUDDLE_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Add a room with its booking policy
    AddRoom(AddRoomCommand),

    /// List configured rooms
    Rooms(RoomsCommand),

    /// Set a room's weekly operating hours for one day of week
    SetHours(SetHoursCommand),

    /// Set a per-date closure or special hours for a room
    SetOverride(SetOverrideCommand),

    /// Show a room's free/busy slot grid for a date
    Day(DayCommand),

    /// Show a room's per-day booking counts for a month
    Month(MonthCommand),

    /// Show the bookable start times for a duration on a date
    Options(OptionsCommand),

    /// Book a room
    Book(BookCommand),

    /// Move or retitle an existing reservation
    Amend(AmendCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// List a user's reservations
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
