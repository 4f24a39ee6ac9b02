use crate::error::DashboardError;
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// Initialise file logging, filtered by `RUST_LOG` (default `info`).
///
/// Nothing is ever written to the terminal: without a `path` no subscriber is installed.
pub fn init_logging(path: Option<&Path>) -> Result<(), DashboardError> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| {
            DashboardError::Logging(format!("cannot open {}: {error}", path.display()))
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| DashboardError::Logging(error.to_string()))
}
