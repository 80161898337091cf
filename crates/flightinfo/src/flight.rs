//! Core flight types for flightinfo.
//!
//! This module defines the flight record kept by the store, its status
//! enumeration, and the text encodings used for timestamps and time spans in
//! the persisted document.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseSpanError;

/// Formats accepted for naive timestamps, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format used when writing timestamps.
const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Largest day count a time span may carry.
const MAX_SPAN_DAYS: i64 = 10_675_199;

/// Nanoseconds per 100ns tick, the resolution of the span format.
const NANOS_PER_TICK: i64 = 100;

/// Digits in the fractional part of the span format.
const TICK_DIGITS: usize = 7;

/// The operational status of a flight.
///
/// The set is closed: anything outside these five values is rejected when a
/// document is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FlightStatus {
    /// Operating to schedule.
    #[default]
    OnTime,
    /// Running behind schedule.
    Delayed,
    /// Will not operate.
    Cancelled,
    /// Passengers are boarding.
    Boarding,
    /// Airborne.
    InFlight,
}

impl FlightStatus {
    /// Every status, in declaration order.
    ///
    /// The position of a status in this array is its legacy integer index.
    pub const ALL: [Self; 5] = [
        Self::OnTime,
        Self::Delayed,
        Self::Cancelled,
        Self::Boarding,
        Self::InFlight,
    ];

    /// Variant names as they appear in documents.
    const NAMES: &'static [&'static str] =
        &["OnTime", "Delayed", "Cancelled", "Boarding", "InFlight"];

    /// The name written to documents and shown in tables.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTime => "OnTime",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
            Self::Boarding => "Boarding",
            Self::InFlight => "InFlight",
        }
    }

    /// Look up a status by its legacy integer index.
    #[must_use]
    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown flight status '{s}'"))
    }
}

impl<'de> Deserialize<'de> for FlightStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StatusVisitor)
    }
}

/// Accepts a status either by name or by legacy integer index.
struct StatusVisitor;

impl Visitor<'_> for StatusVisitor {
    type Value = FlightStatus;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flight status name or an index between 0 and 4")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value
            .parse()
            .map_err(|_| E::unknown_variant(value, FlightStatus::NAMES))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        FlightStatus::from_index(value)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .ok()
            .and_then(FlightStatus::from_index)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(value), &self))
    }
}

/// A single scheduled flight.
///
/// Field names are written in PascalCase to stay compatible with existing
/// data files. Missing fields take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Flight {
    /// Flight number, the key used for removal.
    #[serde(deserialize_with = "string_or_null")]
    pub flight_number: String,

    /// Operating airline.
    #[serde(deserialize_with = "string_or_null")]
    pub airline: String,

    /// Destination, matched case-insensitively by queries.
    #[serde(deserialize_with = "string_or_null")]
    pub destination: String,

    /// Scheduled departure, naive local time.
    #[serde(with = "timestamp")]
    pub departure_time: NaiveDateTime,

    /// Scheduled arrival, naive local time.
    #[serde(with = "timestamp")]
    pub arrival_time: NaiveDateTime,

    /// Current status.
    pub status: FlightStatus,

    /// Elapsed time span. Not checked against the departure and arrival times.
    #[serde(with = "span")]
    pub duration: Duration,

    /// Aircraft type, free text.
    #[serde(deserialize_with = "string_or_null")]
    pub aircraft_type: String,

    /// Departure terminal, free text.
    #[serde(deserialize_with = "string_or_null")]
    pub terminal: String,
}

impl Default for Flight {
    fn default() -> Self {
        Self {
            flight_number: String::new(),
            airline: String::new(),
            destination: String::new(),
            departure_time: NaiveDateTime::default(),
            arrival_time: NaiveDateTime::default(),
            status: FlightStatus::default(),
            duration: Duration::zero(),
            aircraft_type: String::new(),
            terminal: String::new(),
        }
    }
}

impl Flight {
    /// Create an on-time flight whose duration is the scheduled block time.
    #[must_use]
    pub fn new(
        flight_number: impl Into<String>,
        airline: impl Into<String>,
        destination: impl Into<String>,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            airline: airline.into(),
            destination: destination.into(),
            departure_time,
            arrival_time,
            duration: arrival_time - departure_time,
            ..Self::default()
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: FlightStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the recorded duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the aircraft type.
    #[must_use]
    pub fn with_aircraft_type(mut self, aircraft_type: impl Into<String>) -> Self {
        self.aircraft_type = aircraft_type.into();
        self
    }

    /// Set the terminal.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = terminal.into();
        self
    }

    /// Time between scheduled departure and arrival.
    #[must_use]
    pub fn scheduled_duration(&self) -> Duration {
        self.arrival_time - self.departure_time
    }

    /// Calendar date of departure.
    #[must_use]
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_time.date()
    }

    /// Whether the flight arrives no earlier than it departs.
    #[must_use]
    pub fn has_consistent_times(&self) -> bool {
        self.arrival_time >= self.departure_time
    }
}

/// Parse a naive timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.fraction]`, a space in place of the `T`,
/// minute precision, or an RFC 3339 value whose local wall-clock time is kept.
///
/// # Errors
///
/// Returns the parse error of the RFC 3339 attempt if no format matches.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let input = input.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(timestamp);
        }
    }
    DateTime::parse_from_rfc3339(input).map(|dt| dt.naive_local())
}

/// Format a timestamp the way documents store it.
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_OUTPUT_FORMAT).to_string()
}

/// Parse a time span in `[-][d.]hh:mm[:ss[.fffffff]]` form.
///
/// # Errors
///
/// Returns an error if the text is not a well-formed span or a component is
/// out of range.
pub fn parse_span(input: &str) -> Result<Duration, ParseSpanError> {
    let invalid = |reason| ParseSpanError::new(input, reason);
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let parts: Vec<&str> = body.split(':').collect();
    let (head, minutes, tail) = match parts.as_slice() {
        [head, minutes] => (*head, *minutes, None),
        [head, minutes, tail] => (*head, *minutes, Some(*tail)),
        _ => return Err(invalid("expected hh:mm:ss")),
    };

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (
            parse_component(days, MAX_SPAN_DAYS)
                .map_err(|_| invalid("day count out of range"))?,
            hours,
        ),
        None => (0, head),
    };
    let hours = parse_component(hours, 23).map_err(|_| invalid("hours must be 0-23"))?;
    let minutes = parse_component(minutes, 59).map_err(|_| invalid("minutes must be 0-59"))?;

    let (seconds, ticks) = match tail {
        None => (0, 0),
        Some(tail) => {
            let (seconds, fraction) = match tail.split_once('.') {
                Some((seconds, fraction)) => (seconds, Some(fraction)),
                None => (tail, None),
            };
            let seconds =
                parse_component(seconds, 59).map_err(|_| invalid("seconds must be 0-59"))?;
            let ticks = match fraction {
                None => 0,
                Some(fraction) => parse_ticks(fraction)
                    .ok_or_else(|| invalid("fraction must be 1-7 digits"))?,
            };
            (seconds, ticks)
        }
    };

    let span = Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds)
        + Duration::nanoseconds(ticks * NANOS_PER_TICK);
    Ok(if negative { -span } else { span })
}

/// Format a time span as `[-][d.]hh:mm:ss[.fffffff]`.
///
/// The day part and the fraction are only written when non-zero. Precision
/// below 100ns is dropped.
#[must_use]
pub fn format_span(span: &Duration) -> String {
    let negative = *span < Duration::zero();
    let magnitude = if negative { -*span } else { *span };

    let total_seconds = magnitude.num_seconds();
    let ticks = (magnitude - Duration::seconds(total_seconds))
        .num_nanoseconds()
        .unwrap_or(0)
        / NANOS_PER_TICK;

    let days = total_seconds / 86_400;
    let hours = total_seconds % 86_400 / 3_600;
    let minutes = total_seconds % 3_600 / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        let _ = write!(out, "{days}.");
    }
    let _ = write!(out, "{hours:02}:{minutes:02}:{seconds:02}");
    if ticks > 0 {
        let _ = write!(out, ".{ticks:0width$}", width = TICK_DIGITS);
    }
    out
}

fn parse_component(text: &str, max: i64) -> Result<i64, ParseSpanError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseSpanError::new(text, "expected digits"));
    }
    text.parse::<i64>()
        .ok()
        .filter(|value| *value <= max)
        .ok_or_else(|| ParseSpanError::new(text, "component out of range"))
}

/// Convert a fractional-second digit string to 100ns ticks.
fn parse_ticks(fraction: &str) -> Option<i64> {
    if fraction.is_empty()
        || fraction.len() > TICK_DIGITS
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let padded = format!("{fraction:0<width$}", width = TICK_DIGITS);
    padded.parse().ok()
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde codec for naive timestamps.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

/// Serde codec for time spans.
mod span {
    use chrono::Duration;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    /// Spans longer than `parse_span` accepts are rejected.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.num_days().abs() > super::MAX_SPAN_DAYS {
            return Err(ser::Error::custom(format!(
                "time span of {} days exceeds the {} day limit",
                value.num_days(),
                super::MAX_SPAN_DAYS
            )));
        }
        serializer.serialize_str(&super::format_span(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_span(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FlightStatus::OnTime.to_string(), "OnTime");
        assert_eq!(FlightStatus::InFlight.to_string(), "InFlight");
    }

    #[test]
    fn test_status_default_is_on_time() {
        assert_eq!(FlightStatus::default(), FlightStatus::OnTime);
    }

    #[test]
    fn test_status_from_str_ignores_case() {
        assert_eq!("delayed".parse::<FlightStatus>(), Ok(FlightStatus::Delayed));
        assert_eq!("BOARDING".parse::<FlightStatus>(), Ok(FlightStatus::Boarding));
        assert!("Diverted".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_status_from_index() {
        assert_eq!(FlightStatus::from_index(0), Some(FlightStatus::OnTime));
        assert_eq!(FlightStatus::from_index(4), Some(FlightStatus::InFlight));
        assert_eq!(FlightStatus::from_index(5), None);
    }

    #[test]
    fn test_status_deserialize_by_name_and_index() {
        let by_name: FlightStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        let by_index: FlightStatus = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, FlightStatus::Cancelled);
        assert_eq!(by_index, FlightStatus::Cancelled);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(serde_json::from_str::<FlightStatus>("\"Diverted\"").is_err());
        assert!(serde_json::from_str::<FlightStatus>("7").is_err());
        assert!(serde_json::from_str::<FlightStatus>("-1").is_err());
        assert!(serde_json::from_str::<FlightStatus>("true").is_err());
    }

    #[test]
    fn test_status_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&FlightStatus::InFlight).unwrap(),
            "\"InFlight\""
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(ts("2023-06-12T10:00:00"), expected);
        assert_eq!(ts("2023-06-12 10:00:00"), expected);
        assert_eq!(ts("2023-06-12T10:00"), expected);
        assert_eq!(ts("2023-06-12T10:00:00+02:00"), expected);
        assert!(parse_timestamp("12/06/2023").is_err());
    }

    #[test]
    fn test_parse_timestamp_fraction() {
        let parsed = ts("2023-06-12T10:00:00.25");
        assert_eq!(parsed, ts("2023-06-12T10:00:00") + Duration::milliseconds(250));
    }

    #[test]
    fn test_format_timestamp_omits_zero_fraction() {
        assert_eq!(format_timestamp(&ts("2023-06-12T10:00")), "2023-06-12T10:00:00");
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span("02:00:00").unwrap(), Duration::hours(2));
        assert_eq!(parse_span("01:30").unwrap(), Duration::minutes(90));
        assert_eq!(
            parse_span("1.02:03:04").unwrap(),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4)
        );
        assert_eq!(parse_span("-00:45:00").unwrap(), -Duration::minutes(45));
        assert_eq!(
            parse_span("00:00:01.5").unwrap(),
            Duration::milliseconds(1500)
        );
        assert_eq!(
            parse_span("00:00:00.0000001").unwrap(),
            Duration::nanoseconds(100)
        );
    }

    #[test]
    fn test_parse_span_rejects_malformed() {
        assert!(parse_span("").is_err());
        assert!(parse_span("2h").is_err());
        assert!(parse_span("24:00:00").is_err());
        assert!(parse_span("00:60:00").is_err());
        assert!(parse_span("00:00:60").is_err());
        assert!(parse_span("00:00:00.12345678").is_err());
        assert!(parse_span("1:2:3:4").is_err());
        assert!(parse_span("99999999.00:00:00").is_err());
    }

    #[test]
    fn test_format_span() {
        assert_eq!(format_span(&Duration::hours(2)), "02:00:00");
        assert_eq!(format_span(&Duration::zero()), "00:00:00");
        assert_eq!(
            format_span(&(Duration::days(3) + Duration::minutes(5))),
            "3.00:05:00"
        );
        assert_eq!(format_span(&-Duration::minutes(45)), "-00:45:00");
        assert_eq!(format_span(&Duration::milliseconds(1500)), "00:00:01.5000000");
    }

    #[test]
    fn test_flight_new_sets_scheduled_duration() {
        let flight = Flight::new(
            "AA123",
            "WizAir",
            "Paris",
            ts("2023-06-12T10:00"),
            ts("2023-06-12T12:00"),
        );
        assert_eq!(flight.duration, Duration::hours(2));
        assert_eq!(flight.status, FlightStatus::OnTime);
        assert_eq!(flight.scheduled_duration(), Duration::hours(2));
        assert_eq!(flight.departure_date(), NaiveDate::from_ymd_opt(2023, 6, 12).unwrap());
        assert!(flight.has_consistent_times());
    }

    #[test]
    fn test_flight_inconsistent_times() {
        let flight = Flight::new(
            "X1",
            "Air",
            "Oslo",
            ts("2023-06-12T12:00"),
            ts("2023-06-12T10:00"),
        );
        assert!(!flight.has_consistent_times());
    }

    #[test]
    fn test_flight_serializes_pascal_case() {
        let flight = Flight::new(
            "AA123",
            "WizAir",
            "Paris",
            ts("2023-06-12T10:00"),
            ts("2023-06-12T12:00"),
        )
        .with_aircraft_type("Airbus A320")
        .with_terminal("2");

        let value = serde_json::to_value(&flight).unwrap();
        assert_eq!(value["FlightNumber"], "AA123");
        assert_eq!(value["DepartureTime"], "2023-06-12T10:00:00");
        assert_eq!(value["Status"], "OnTime");
        assert_eq!(value["Duration"], "02:00:00");
        assert_eq!(value["AircraftType"], "Airbus A320");
        assert_eq!(value["Terminal"], "2");
    }

    #[test]
    fn test_flight_missing_fields_take_defaults() {
        let flight: Flight = serde_json::from_str(r#"{"FlightNumber": "LH1"}"#).unwrap();
        assert_eq!(flight.flight_number, "LH1");
        assert_eq!(flight.status, FlightStatus::OnTime);
        assert_eq!(flight.duration, Duration::zero());
        assert!(flight.terminal.is_empty());
        assert_eq!(flight.departure_time, NaiveDateTime::default());
    }

    #[test]
    fn test_flight_null_text_reads_as_empty() {
        let flight: Flight =
            serde_json::from_str(r#"{"FlightNumber": "LH1", "Terminal": null}"#).unwrap();
        assert!(flight.terminal.is_empty());
    }

    #[test]
    fn test_flight_legacy_document_entry() {
        let json = r#"{
            "FlightNumber": "BA456",
            "Airline": "British Airways",
            "Destination": "London",
            "DepartureTime": "2023-05-30T08:15:00",
            "ArrivalTime": "2023-05-30T09:45:00",
            "Status": 1,
            "Duration": "01:30:00",
            "AircraftType": "Boeing 737",
            "Terminal": "5"
        }"#;
        let flight: Flight = serde_json::from_str(json).unwrap();
        assert_eq!(flight.status, FlightStatus::Delayed);
        assert_eq!(flight.duration, Duration::minutes(90));
        assert_eq!(flight.arrival_time, ts("2023-05-30T09:45:00"));
    }

    #[test]
    fn test_flight_with_oversized_span_does_not_serialize() {
        let flight = Flight::default().with_duration(Duration::days(20_000_000));
        let err = serde_json::to_string(&flight).unwrap_err();
        assert!(err.to_string().contains("day limit"));

        let backwards = Flight::default().with_duration(-Duration::days(20_000_000));
        assert!(serde_json::to_string(&backwards).is_err());
    }

    #[test]
    fn test_flight_with_longest_span_reads_back() {
        let longest = Duration::days(MAX_SPAN_DAYS) + Duration::hours(23);
        let flight = Flight::default().with_duration(longest);

        let json = serde_json::to_string(&flight).unwrap();
        let back: Flight = serde_json::from_str(&json).unwrap();
        assert_eq!(back.duration, longest);
    }

    #[test]
    fn test_flight_rejects_bad_timestamp() {
        let result = serde_json::from_str::<Flight>(r#"{"DepartureTime": "yesterday"}"#);
        assert!(result.is_err());
    }
}
