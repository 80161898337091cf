//! In-memory flight store for flightinfo.
//!
//! [`FlightStore`] owns an insertion-ordered list of flights, reads and writes
//! the JSON flights document, and answers filtered queries. Every query
//! returns a freshly built `Vec` sorted with a stable sort, so flights with
//! equal sort keys keep their stored order.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LoadError, SaveError};
use crate::flight::{Flight, FlightStatus};

/// On-disk shape of a flights document, as read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FlightsDocument {
    flights: Option<Vec<Flight>>,
}

/// On-disk shape of a flights document, as written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FlightsDocumentRef<'a> {
    flights: &'a [Flight],
}

/// The in-memory owner of all flight records.
///
/// Provides:
/// - Additive loading from a JSON document
/// - Whole-document saving that never leaves a partial file behind
/// - Add and remove-by-number
/// - Filtered, sorted queries returning independent copies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightStore {
    flights: Vec<Flight>,
}

impl FlightStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given flights in order.
    #[must_use]
    pub fn with_flights(flights: Vec<Flight>) -> Self {
        Self { flights }
    }

    /// Append every flight in the document at `path`.
    ///
    /// The document is parsed completely before anything is appended, so a
    /// failure leaves the store as it was. A document whose `Flights` array is
    /// `null` or missing adds nothing and is not an error.
    ///
    /// Returns the number of flights appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid flights
    /// document.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        debug!("Loading flights from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Option<FlightsDocument> =
            serde_json::from_str(&content).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let Some(flights) = document.and_then(|doc| doc.flights) else {
            debug!("No flights array in {}", path.display());
            return Ok(0);
        };

        let added = flights.len();
        self.flights.extend(flights);
        info!("Loaded {} flights from {}", added, path.display());
        Ok(added)
    }

    /// Write every flight to `path` as an indented JSON document.
    ///
    /// The document is rendered in memory, written to a sibling temporary
    /// file and then renamed over `path`. On failure the target is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let document = FlightsDocumentRef {
            flights: &self.flights,
        };
        let content = serde_json::to_string_pretty(&document).map_err(SaveError::Serialize)?;

        let temp = temp_path(path);
        let write_error = |source| SaveError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Err(source) = fs::write(&temp, content.as_bytes()) {
            let _ = fs::remove_file(&temp);
            return Err(write_error(source));
        }
        if let Err(source) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(write_error(source));
        }

        info!("Saved {} flights to {}", self.flights.len(), path.display());
        Ok(())
    }

    /// Append a flight. Duplicate flight numbers are allowed.
    pub fn add(&mut self, flight: Flight) {
        debug!("Adding flight {}", flight.flight_number);
        self.flights.push(flight);
    }

    /// Remove every flight whose number equals `flight_number` exactly.
    ///
    /// Returns how many flights were removed.
    pub fn remove(&mut self, flight_number: &str) -> usize {
        let before = self.flights.len();
        self.flights.retain(|f| f.flight_number != flight_number);
        let removed = before - self.flights.len();
        debug!("Removed {} flights numbered {}", removed, flight_number);
        removed
    }

    /// Snapshot of every flight, in stored order.
    #[must_use]
    pub fn all(&self) -> Vec<Flight> {
        self.flights.clone()
    }

    /// Number of stored flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Check if the store holds no flights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Drop every stored flight.
    pub fn clear(&mut self) {
        self.flights.clear();
    }

    /// Flights operated by `airline` (exact match), by departure time.
    #[must_use]
    pub fn by_airline(&self, airline: &str) -> Vec<Flight> {
        self.select(|f| f.airline == airline, |f| f.departure_time)
    }

    /// Delayed flights, by departure time.
    #[must_use]
    pub fn delayed(&self) -> Vec<Flight> {
        self.by_status(FlightStatus::Delayed)
    }

    /// Flights with the given status, by departure time.
    #[must_use]
    pub fn by_status(&self, status: FlightStatus) -> Vec<Flight> {
        self.select(|f| f.status == status, |f| f.departure_time)
    }

    /// Flights departing on the calendar date `date`, by departure time.
    #[must_use]
    pub fn by_departure_date(&self, date: NaiveDate) -> Vec<Flight> {
        self.select(|f| f.departure_date() == date, |f| f.departure_time)
    }

    /// Flights to `destination`, ignoring case, by departure time.
    #[must_use]
    pub fn by_destination(&self, destination: &str) -> Vec<Flight> {
        let wanted = destination.to_lowercase();
        self.select(
            |f| f.destination.to_lowercase() == wanted,
            |f| f.departure_time,
        )
    }

    /// Flights arriving between `start` and `end` inclusive, by arrival time.
    ///
    /// An inverted range matches nothing.
    #[must_use]
    pub fn arrived_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Flight> {
        self.select(
            |f| start <= f.arrival_time && f.arrival_time <= end,
            |f| f.arrival_time,
        )
    }

    /// Clone the matching flights and stable-sort them by `key`.
    fn select<K: Ord>(
        &self,
        predicate: impl Fn(&Flight) -> bool,
        key: impl FnMut(&Flight) -> K,
    ) -> Vec<Flight> {
        let mut matches: Vec<Flight> = self
            .flights
            .iter()
            .filter(|&f| predicate(f))
            .cloned()
            .collect();
        matches.sort_by_key(key);
        matches
    }
}

impl From<Vec<Flight>> for FlightStore {
    fn from(flights: Vec<Flight>) -> Self {
        Self::with_flights(flights)
    }
}

impl Extend<Flight> for FlightStore {
    fn extend<I: IntoIterator<Item = Flight>>(&mut self, iter: I) {
        self.flights.extend(iter);
    }
}

/// Check whether two paths name the same document.
///
/// Paths that exist are compared after resolving `.`, `..` and symlinks;
/// otherwise they are compared as written.
#[must_use]
pub fn is_same_document(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Sibling path used while a save is in progress.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("flights"));
    name.push(".tmp");
    path.with_file_name(name)
}
