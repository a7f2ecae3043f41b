//! Core types and constants for the FunPDBe deposition API.

use serde::Serialize;

/// Resource names registered with the deposition system.
pub const RESOURCES: &[&str] = &[
    "cath-funsites",
    "3dligandsite",
    "nod",
    "popscomp",
    "14-3-3-pred",
    "dynamine",
    "cansar",
    "credo",
    "depth",
    "akid",
];

/// Location of the published FunPDBe JSON schema.
pub const SCHEMA_URL: &str =
    "https://gitlab.ebi.ac.uk/pdbe-kb/funpdbe/funpdbe-schema/raw/master/funpdbe_schema.json";

/// Default log file written by the command-line client.
pub const LOG_FILENAME: &str = "client.log";

/// File suffix of documents picked up from a directory.
pub const DOCUMENT_SUFFIX: &str = "json";

/// Expected status for a successful read.
pub const STATUS_OK: u16 = 200;

/// Expected status for a successful create or overwrite.
pub const STATUS_CREATED: u16 = 201;

/// Expected status for a successful delete.
///
/// The deposition service answers deletes with a redirect.
pub const STATUS_DELETED: u16 = 301;

/// Document field holding the PDB identifier.
pub const PDB_ID_FIELD: &str = "pdb_id";

/// Document field holding the resource name.
pub const RESOURCE_FIELD: &str = "data_resource";

/// Which deployment of the deposition API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ApiTarget {
    #[default]
    Prod,
    Dev,
    Local,
}

impl ApiTarget {
    /// Base URL of the entries endpoint, always ending in `/`.
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiTarget::Prod => "https://www.ebi.ac.uk/pdbe/funpdbe/deposition/entries/",
            ApiTarget::Dev => "https://wwwdev.ebi.ac.uk/pdbe/funpdbe/deposition/entries/",
            ApiTarget::Local => "http://127.0.0.1:8000/entries/",
        }
    }
}

/// Body and status of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Success/attempt counts of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchTally {
    pub succeeded: usize,
    pub attempted: usize,
}

impl BatchTally {
    /// Returns true if every attempted document succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

impl std::fmt::Display for BatchTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} out of {}", self.succeeded, self.attempted)
    }
}
