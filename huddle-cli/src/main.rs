//! Main entry point for the huddle CLI.
//!
//! This is the command-line interface for the huddle meeting-room
//! reservation system. It provides commands for managing rooms and
//! bookings:
//! - `add-room` / `rooms`: configure and inspect rooms
//! - `set-hours` / `set-override`: weekly hours and per-date overrides
//! - `day` / `month` / `options`: availability queries
//! - `book` / `amend` / `cancel` / `list`: the reservation lifecycle

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = huddle::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        json: cli.json,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
    };

    let result = match cli.command {
        cli::Command::AddRoom(cmd) => cmd.execute(&global),
        cli::Command::Rooms(cmd) => cmd.execute(&global),
        cli::Command::SetHours(cmd) => cmd.execute(&global),
        cli::Command::SetOverride(cmd) => cmd.execute(&global),
        cli::Command::Day(cmd) => cmd.execute(&global),
        cli::Command::Month(cmd) => cmd.execute(&global),
        cli::Command::Options(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Amend(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(),
    };

    if let Err(e) = result {
        if global.json {
            let envelope = huddle::output::Envelope::<()>::error(e.to_string());
            if let Ok(json) = serde_json::to_string_pretty(&envelope) {
                println!("{json}");
            }
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
