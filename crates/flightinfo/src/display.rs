//! Console rendering of flight lists.

use std::fmt::Write as _;

use crate::flight::Flight;

/// Table header. Row columns are padded to line up with it.
pub const HEADER: &str =
    "Flight number |   Departure time    |     Arrival time    | Terminal | Status";

/// Line printed in place of a table when there is nothing to show.
pub const EMPTY_MESSAGE: &str = "No flights available.";

/// Default strftime format for table timestamps.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render flights as a fixed-width table using [`DEFAULT_TIME_FORMAT`].
#[must_use]
pub fn render(flights: &[Flight]) -> String {
    render_with(flights, DEFAULT_TIME_FORMAT)
}

/// Render flights as a fixed-width table with a custom timestamp format.
///
/// The format must already be known to be valid; see
/// [`Config::validate`](crate::Config::validate).
#[must_use]
pub fn render_with(flights: &[Flight], time_format: &str) -> String {
    if flights.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "{}", "-".repeat(HEADER.len()));
    for flight in flights {
        let _ = writeln!(
            out,
            "{:^13} | {:^19} | {:^19} | {:^8} | {}",
            flight.flight_number,
            flight.departure_time.format(time_format).to_string(),
            flight.arrival_time.format(time_format).to_string(),
            flight.terminal,
            flight.status,
        );
    }
    out
}

/// Print flights to stdout.
pub fn print(flights: &[Flight], time_format: &str) {
    print!("{}", render_with(flights, time_format));
}
