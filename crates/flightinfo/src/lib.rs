//! `flightinfo` - An in-memory flight information store
//!
//! This library loads flight records from a JSON document, answers filtered
//! and sorted queries over them, and writes them back.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod flight;
pub mod logging;
pub mod store;

pub use config::Config;
pub use error::{Error, LoadError, ParseSpanError, Result, SaveError};
pub use flight::{Flight, FlightStatus};
pub use logging::init_logging;
pub use store::FlightStore;
