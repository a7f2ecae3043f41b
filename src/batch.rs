//! Sequential processing of every document in a directory.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::client::Client;
use crate::types::{BatchTally, DOCUMENT_SUFFIX, STATUS_CREATED};

/// List the `.json` files directly inside `dir`, sorted by path.
///
/// Subdirectories are not searched. An unreadable directory yields no files.
pub fn collect_documents(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_document_suffix(path))
        .collect();
    files.sort();
    files
}

/// Returns true if `path` ends in `.json`.
pub fn has_document_suffix(path: &Path) -> bool {
    path.extension()
        .map(|e| e == DOCUMENT_SUFFIX)
        .unwrap_or(false)
}

/// POST every document in `dir`, one at a time.
///
/// A failing document is logged and skipped; the loop always runs to the
/// end. Only a `201` answer counts as a success.
pub fn run_batch(
    client: &mut Client,
    dir: &Path,
    resource: Option<&str>,
    overwrite: bool,
) -> BatchTally {
    let mut tally = BatchTally::default();

    for path in collect_documents(dir) {
        info!("BEGIN");
        let outcome = client.post_file(Some(&path), resource, overwrite);
        if matches!(&outcome, Ok(response) if response.status == STATUS_CREATED) {
            tally.succeeded += 1;
        }
        tally.attempted += 1;
        if let Err(e) = outcome {
            warn!(path = %path.display(), error = %e, "document not posted");
        }
        info!("END");
    }

    info!(
        "Batch POSTing: {} out of {} POSTed successfully",
        tally.succeeded, tally.attempted
    );
    tally
}

/// Validate every document in `dir` against the schema.
pub fn validate_batch(client: &mut Client, dir: &Path) -> BatchTally {
    let mut tally = BatchTally::default();

    for path in collect_documents(dir) {
        if client.validate_file(Some(&path)).is_ok() {
            tally.succeeded += 1;
        }
        tally.attempted += 1;
    }

    info!(
        "Batch validation: {} out of {} valid",
        tally.succeeded, tally.attempted
    );
    tally
}
