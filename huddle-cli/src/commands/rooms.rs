//! Rooms command implementation.
//!
//! This module implements the `rooms` command, which lists configured
//! rooms and, with `--schedule`, each room's weekly operating hours.

use std::io::Write;

use clap::Args;

use huddle::output::Envelope;
use huddle::{Room, WeekSchedule};

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, print_json, GlobalOptions};

const DOW_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// List configured rooms.
#[derive(Args)]
pub struct RoomsCommand {
    /// Also show each room's weekly operating hours
    #[arg(long)]
    pub schedule: bool,
}

impl RoomsCommand {
    /// Execute the rooms command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(&config)?;

        let rooms = db.list_rooms()?;
        let schedules = if self.schedule {
            rooms
                .iter()
                .map(|room| db.get_week_schedule(room.id()).map(Some))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![None; rooms.len()]
        };

        if global.json {
            let data: Vec<serde_json::Value> = rooms
                .iter()
                .zip(&schedules)
                .map(|(room, schedule)| match schedule {
                    Some(s) => serde_json::json!({"room": room, "schedule": s}),
                    None => serde_json::json!({"room": room}),
                })
                .collect();
            return print_json(&Envelope::ok(data));
        }

        format_as_table(&rooms, &schedules)
    }
}

fn format_as_table(rooms: &[Room], schedules: &[Option<WeekSchedule>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(
        handle,
        "ID\tNAME\tLOCATION\tCAPACITY\tACTIVE\tSLOT\tBUFFER\tDURATION\tHORIZON"
    )?;

    for (room, schedule) in rooms.iter().zip(schedules) {
        let policy = room.policy();
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}-{}\t{}d",
            room.id().value(),
            room.name(),
            room.location().unwrap_or("-"),
            room.capacity(),
            if room.active() { "yes" } else { "no" },
            policy.slot_minutes,
            policy.buffer_minutes,
            policy.min_minutes,
            policy.max_minutes,
            policy.open_days_ahead,
        )?;

        if let Some(schedule) = schedule {
            for (dow, hours) in schedule.iter() {
                let name = DOW_NAMES[usize::from(dow) - 1];
                match hours.window() {
                    Some((open, close)) => writeln!(handle, "    {name} {open}-{close}")?,
                    None => writeln!(handle, "    {name} closed")?,
                }
            }
        }
    }

    Ok(())
}
