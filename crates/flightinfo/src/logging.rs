//! Logging setup for the `flinfo` binary.
//!
//! The library emits events under the `flightinfo` target while the binary
//! logs under `flinfo`, so the default filter names both. Events go to
//! stderr, leaving stdout to tables and JSON.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets enabled by the default filter: the library, then the binary.
const LOG_TARGETS: [&str; 2] = ["flightinfo", "flinfo"];

/// How much `flinfo` reports on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Load and save outcomes and warnings.
    #[default]
    Normal,
    /// Per-operation detail.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level shown at this verbosity.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset,
    /// e.g. `flightinfo=info,flinfo=info`.
    #[must_use]
    pub fn default_directives(&self) -> String {
        let level = self.to_level_filter();
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the stderr subscriber for `flinfo`.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this more than once
/// keeps the first subscriber.
///
/// # Examples
///
/// ```no_run
/// use flightinfo::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
