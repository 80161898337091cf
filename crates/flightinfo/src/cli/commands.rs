//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::{Args, ValueEnum};

use crate::error::{Error, Result};
use crate::flight::{parse_span, parse_timestamp, Flight, FlightStatus};

/// Sync command arguments.
#[derive(Debug, Default, Args)]
pub struct SyncCommand {
    /// Write to this document instead of the configured save path
    #[arg(long, value_name = "FILE")]
    pub to: Option<PathBuf>,
}

/// Output selection shared by listing commands.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Airline query arguments.
#[derive(Debug, Args)]
pub struct AirlineCommand {
    /// Airline name (case-sensitive)
    pub airline: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Status query arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Status to match
    #[arg(value_enum)]
    pub status: StatusArg,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Departure date query arguments.
#[derive(Debug, Args)]
pub struct DateCommand {
    /// Departure date (YYYY-MM-DD)
    #[arg(value_parser = parse_date)]
    pub date: NaiveDate,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Destination query arguments.
#[derive(Debug, Args)]
pub struct DestinationCommand {
    /// Destination (case-insensitive)
    pub destination: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arrival window query arguments.
#[derive(Debug, Args)]
pub struct ArrivedCommand {
    /// Start of the window, inclusive (e.g. "2023-05-30T00:00:01")
    #[arg(long, value_parser = parse_datetime)]
    pub from: NaiveDateTime,

    /// End of the window, inclusive
    #[arg(long, value_parser = parse_datetime)]
    pub until: NaiveDateTime,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Flight number
    #[arg(long)]
    pub number: String,

    /// Operating airline
    #[arg(long)]
    pub airline: String,

    /// Destination
    #[arg(long)]
    pub destination: String,

    /// Scheduled departure
    #[arg(long, value_parser = parse_datetime)]
    pub departure: NaiveDateTime,

    /// Scheduled arrival
    #[arg(long, value_parser = parse_datetime)]
    pub arrival: NaiveDateTime,

    /// Flight status
    #[arg(long, value_enum, default_value = "on-time")]
    pub status: StatusArg,

    /// Duration as hh:mm:ss (defaults to arrival minus departure)
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Aircraft type
    #[arg(long, default_value = "")]
    pub aircraft: String,

    /// Departure terminal
    #[arg(long, default_value = "")]
    pub terminal: String,
}

impl AddCommand {
    /// Build the flight described by these arguments.
    #[must_use]
    pub fn into_flight(self) -> Flight {
        let flight = Flight::new(
            self.number,
            self.airline,
            self.destination,
            self.departure,
            self.arrival,
        )
        .with_status(self.status.into())
        .with_aircraft_type(self.aircraft)
        .with_terminal(self.terminal);

        match self.duration {
            Some(duration) => flight.with_duration(duration),
            None => flight,
        }
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Flight number to remove (every match is removed)
    pub number: String,
}

/// Flight status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Operating to schedule
    OnTime,
    /// Running behind schedule
    Delayed,
    /// Will not operate
    Cancelled,
    /// Passengers are boarding
    Boarding,
    /// Airborne
    InFlight,
}

impl From<StatusArg> for FlightStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::OnTime => Self::OnTime,
            StatusArg::Delayed => Self::Delayed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Boarding => Self::Boarding,
            StatusArg::InFlight => Self::InFlight,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table
    #[default]
    Table,
    /// JSON array of flights
    Json,
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid_input(format!("expected YYYY-MM-DD: {e}")))
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value)
        .map_err(|e| Error::invalid_input(format!("expected YYYY-MM-DDTHH:MM[:SS]: {e}")))
}

fn parse_duration(value: &str) -> Result<Duration> {
    Ok(parse_span(value)?)
}
