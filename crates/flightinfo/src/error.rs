//! Error types for flightinfo.
//!
//! Loading and saving each have their own error type so callers can decide
//! how to react to a failed document read or write. Both convert into the
//! crate-level [`Error`], which also covers configuration and input problems.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read flights from a document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing or could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not have the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Check if the document does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Failure to write flights to a document.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The flights could not be encoded as JSON.
    #[error("failed to serialize flights: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The document could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A malformed `[-][d.]hh:mm:ss[.fffffff]` time span.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time span '{input}': {reason}")]
pub struct ParseSpanError {
    input: String,
    reason: &'static str,
}

impl ParseSpanError {
    /// Create a span error for the given input text.
    #[must_use]
    pub fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }

    /// Why the span was rejected.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// The main error type for flightinfo operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Document Errors ===
    /// Loading a flights document failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Saving a flights document failed.
    #[error(transparent)]
    Save(#[from] SaveError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// User-supplied input could not be used.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },
}

/// A specialized Result type for flightinfo operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ParseSpanError> for Error {
    fn from(err: ParseSpanError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl Error {
    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
