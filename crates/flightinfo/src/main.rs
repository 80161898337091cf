//! `flinfo` - CLI for flightinfo
//!
//! This binary loads the configured flights document and runs one command
//! against it. Document load and save failures are reported and do not stop
//! the process.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};

use flightinfo::cli::{Cli, Command, OutputFormat};
use flightinfo::store::is_same_document;
use flightinfo::{display, init_logging, Config, Flight, FlightStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(source) = cli.source {
        config.data.source_path = Some(source);
    }

    let source = config.source_path();
    let mut store = FlightStore::new();
    let intact = load_flights(&mut store, &source);

    // Execute the command
    match cli.command {
        None => handle_sync(&store, &config, None, intact),
        Some(Command::Sync(cmd)) => handle_sync(&store, &config, cmd.to, intact),
        Some(Command::List(cmd)) => show(&store.all(), cmd.output.format, &config)?,
        Some(Command::Airline(cmd)) => {
            show(&store.by_airline(&cmd.airline), cmd.output.format, &config)?;
        }
        Some(Command::Delayed(cmd)) => show(&store.delayed(), cmd.output.format, &config)?,
        Some(Command::Status(cmd)) => {
            show(&store.by_status(cmd.status.into()), cmd.output.format, &config)?;
        }
        Some(Command::Date(cmd)) => {
            show(&store.by_departure_date(cmd.date), cmd.output.format, &config)?;
        }
        Some(Command::Destination(cmd)) => show(
            &store.by_destination(&cmd.destination),
            cmd.output.format,
            &config,
        )?,
        Some(Command::Arrived(cmd)) => show(
            &store.arrived_in_range(cmd.from, cmd.until),
            cmd.output.format,
            &config,
        )?,
        Some(Command::Add(cmd)) => {
            let flight = cmd.into_flight();
            if !flight.has_consistent_times() {
                warn!("Flight {} arrives before it departs", flight.flight_number);
            }
            store.add(flight);
            save_flights(&store, &source, &source, intact);
        }
        Some(Command::Remove(cmd)) => {
            let removed = store.remove(&cmd.number);
            info!("Removed {} flights numbered {}", removed, cmd.number);
            save_flights(&store, &source, &source, intact);
        }
    }

    Ok(())
}

/// Load the source document into the store, reporting any failure.
///
/// Returns `false` when the document exists but could not be used, in which
/// case it must not be overwritten.
fn load_flights(store: &mut FlightStore, source: &Path) -> bool {
    match store.load(source) {
        Ok(_) => true,
        Err(e) if e.is_not_found() => {
            warn!("No flights document yet: {e}");
            true
        }
        Err(e) => {
            error!("Error loading flights data: {e}");
            false
        }
    }
}

/// Save the store to `target`, reporting the outcome.
fn save_flights(store: &FlightStore, target: &Path, source: &Path, intact: bool) {
    if !intact && is_same_document(target, source) {
        error!(
            "Not overwriting {} after it failed to load",
            target.display()
        );
        return;
    }
    match store.save(target) {
        Ok(()) => println!("Flights data saved successfully."),
        Err(e) => error!("Error saving flights data: {e}"),
    }
}

fn handle_sync(store: &FlightStore, config: &Config, to: Option<PathBuf>, intact: bool) {
    let target = to.unwrap_or_else(|| config.save_path());
    save_flights(store, &target, &config.source_path(), intact);
    display::print(&store.all(), config.time_format());
}

fn show(
    flights: &[Flight],
    format: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => display::print(flights, config.time_format()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(flights)?),
    }
    Ok(())
}
