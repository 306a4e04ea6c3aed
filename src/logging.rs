//! Tracing subscriber setup for the command line binary.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{ReportError, Result};

/// Maps the `-v` count to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag when set.
pub fn init_logging(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_thread_names(verbose >= 3)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ReportError::Logging(err.to_string()))?;

    debug!(verbose, "logging initialised");
    Ok(())
}
