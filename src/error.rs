//! Error types for document validation and submission.

use std::path::PathBuf;
use thiserror::Error;

/// A local check failed before anything was sent to the deposition API.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("no PDB identifier specified")]
    MissingIdentifier,

    #[error("invalid PDB identifier pattern: \"{id}\"")]
    MalformedIdentifier { id: String },

    #[error("no resource name specified")]
    MissingResource,

    #[error("unknown resource name: \"{name}\"")]
    UnknownResource { name: String },

    #[error("no file path to JSON(s) specified")]
    MissingPath,

    #[error("no document provided")]
    MissingDocument,

    #[error("user name and password are both required")]
    MissingCredentials,

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PreconditionError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Failure to fetch raw schema text from a [`SchemaSource`](crate::SchemaSource).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("schema file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("cannot fetch {location}: {message}")]
    Unreachable { location: String, message: String },
}

/// Why no schema is available for validation.
#[derive(Debug, Error)]
pub enum SchemaUnavailable {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("schema from {location} is not valid JSON: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema cannot be compiled: {message}")]
    Invalid { message: String },
}

/// Errors during validation of a document against a schema.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("schema cannot be compiled: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<Violation> },
}

/// Single schema violation with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "/: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A request could not be sent or its response could not be read.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot build HTTP client: {message}")]
    Build { message: String },

    #[error("{method} {url} failed: {message}")]
    Request {
        method: &'static str,
        url: String,
        message: String,
    },
}

/// Outcome of a failed submission, deletion or retrieval.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("schema unavailable: {0}")]
    SchemaUnavailable(#[from] SchemaUnavailable),

    #[error("JSON does not comply with FunPDBe schema ({} error(s))", errors.len())]
    SchemaViolation { errors: Vec<Violation> },

    #[error("[{status}] FAIL - {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<ValidateError> for SubmitError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::InvalidSchema { message } => {
                SubmitError::SchemaUnavailable(SchemaUnavailable::Invalid { message })
            }
            ValidateError::Invalid { errors } => SubmitError::SchemaViolation { errors },
        }
    }
}

impl SubmitError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SubmitError::Precondition(e) => e.exit_code(),
            SubmitError::SchemaUnavailable(_) | SubmitError::Transport(_) => 3,
            SubmitError::SchemaViolation { .. } | SubmitError::Rejected { .. } => 1,
        }
    }

    /// Returns true if the error was raised before any request to the API.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            SubmitError::Rejected { .. } | SubmitError::Transport(_)
        )
    }
}
