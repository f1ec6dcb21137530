//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell
//! completion scripts for bash, zsh, fish, and PowerShell.

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;

/// Binary name from Cargo.toml
const BIN_NAME: &str = "huddle";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(self) -> Result<(), CliError> {
        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}
