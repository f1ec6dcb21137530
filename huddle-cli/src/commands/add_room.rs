//! Add-room command implementation.
//!
//! This module implements the `add-room` command, which stores a new room
//! together with its booking policy. Slot and buffer defaults come from
//! the configuration (`default_slot_minutes` / `default_buffer_minutes`)
//! when not given on the command line.

use clap::Args;

use huddle::output::Envelope;
use huddle::{BookingPolicy, Room, RoomId};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_date, print_json, GlobalOptions};

/// Add a room with its booking policy.
#[derive(Args)]
pub struct AddRoomCommand {
    /// Room name
    pub name: String,

    /// Room location (e.g. "3F east")
    #[arg(long, value_name = "LOCATION")]
    pub location: Option<String>,

    /// Seating capacity
    #[arg(long, value_name = "PEOPLE", default_value_t = 4)]
    pub capacity: u32,

    /// Slot granularity in minutes (default from config, else 30)
    #[arg(long, value_name = "MINUTES")]
    pub slot: Option<u32>,

    /// Buffer enforced around each booking in minutes (default from config, else 0)
    #[arg(long, value_name = "MINUTES")]
    pub buffer: Option<u32>,

    /// Minimum reservation duration in minutes (default: one slot)
    #[arg(long, value_name = "MINUTES")]
    pub min_duration: Option<u32>,

    /// Maximum reservation duration in minutes
    #[arg(long, value_name = "MINUTES", default_value_t = 240)]
    pub max_duration: u32,

    /// First bookable date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub open_from: Option<String>,

    /// Last bookable date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub open_until: Option<String>,

    /// Accept bookings at most this many days ahead
    #[arg(long, value_name = "DAYS")]
    pub days_ahead: Option<u32>,
}

impl AddRoomCommand {
    /// Execute the add-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;

        let slot = self.slot.or(config.default_slot_minutes).unwrap_or(30);
        let buffer = self.buffer.or(config.default_buffer_minutes).unwrap_or(0);
        let min = self.min_duration.unwrap_or(slot);

        let mut policy = BookingPolicy::new(slot, buffer, min, self.max_duration)
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        policy.open_from = self.open_from.as_deref().map(parse_date).transpose()?;
        policy.open_until = self.open_until.as_deref().map(parse_date).transpose()?;
        if let Some(days) = self.days_ahead {
            policy.open_days_ahead = days;
        }
        policy
            .validate()
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let room = Room::builder(RoomId::new(0), self.name)
            .location(self.location)
            .capacity(self.capacity)
            .policy(policy)
            .build()
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let mut db = open_database(&config)?;
        let stored = db.create_room(&room)?;

        if global.json {
            print_json(&Envelope::ok(&stored))?;
        } else {
            // Just the id, shell-friendly
            println!("{}", stored.id().value());
            if !global.quiet {
                eprintln!(
                    "Added room {} ({}, {} seats, {} min slots)",
                    stored.id(),
                    stored.name(),
                    stored.capacity(),
                    stored.policy().slot_minutes
                );
            }
        }

        Ok(())
    }
}
