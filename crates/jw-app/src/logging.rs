#![forbid(unsafe_code)]

//! Log setup for the binary.
//!
//! The terminal belongs to the UI, so logs only go to a file. Without a
//! log file no subscriber is installed and `tracing` events are dropped.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build a filter from directives, falling back to `info` when they do
/// not parse.
pub fn filter_from(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber appending plain-text logs to `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or a subscriber is already set.
pub fn init_file_logging(path: &Path, directives: &str) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(filter_from(directives))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}
