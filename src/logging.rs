//! Log file setup for the command-line client.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive for this crate at the requested verbosity.
pub fn filter_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("funpdbe_client={}", level)
}

/// Send timestamped log records to `path`, truncating it first.
///
/// # Errors
///
/// Fails if the file cannot be opened or a global subscriber is already set.
pub fn init_file_logging(path: &Path, debug: bool) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let filter = EnvFilter::try_new(filter_directive(debug))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}
