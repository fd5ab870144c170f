//! uupdl CLI - Command-line interface
//!
//! This binary runs automatic-download requests against the UUP dump API and
//! writes the resulting package request as JSON.

mod commands;
mod error;
mod runner;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::autodl::AutoDlArgs;
use commands::config::ConfigCommands;
use commands::lang::LangCommands;

/// Automatic download helper for UUP dump.
#[derive(Debug, Parser)]
#[command(name = "uupdl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an automatic download and write its package request
    Autodl(AutoDlArgs),

    /// Site language lookups
    Lang {
        #[command(subcommand)]
        command: LangCommands,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Autodl(args) => commands::autodl::run(args),
        Commands::Lang { command } => commands::lang::run(command),
        Commands::Config { command } => commands::config::run(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}
