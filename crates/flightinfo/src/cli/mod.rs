//! Command-line interface for flightinfo.
//!
//! This module provides the CLI structure for the `flinfo` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, AirlineCommand, ArrivedCommand, DateCommand, DestinationCommand, ListCommand,
    OutputArgs, OutputFormat, RemoveCommand, StatusArg, StatusCommand, SyncCommand,
};

/// flinfo - Query and maintain a flights document
///
/// Loads flights from a JSON document and answers questions about them:
/// flights by airline, status, departure date, destination, or arrival window.
#[derive(Debug, Parser)]
#[command(name = "flinfo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Flights document to read (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the source document, save it, and show every flight
    Sync(SyncCommand),

    /// Show every flight
    List(ListCommand),

    /// Show flights of one airline
    Airline(AirlineCommand),

    /// Show delayed flights
    Delayed(ListCommand),

    /// Show flights with a given status
    Status(StatusCommand),

    /// Show flights departing on a date
    Date(DateCommand),

    /// Show flights to a destination
    Destination(DestinationCommand),

    /// Show flights arriving within a time window
    Arrived(ArrivedCommand),

    /// Add a flight and save the source document
    Add(AddCommand),

    /// Remove flights by number and save the source document
    Remove(RemoveCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
