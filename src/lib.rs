//! FunPDBe deposition client
//!
//! Validates FunPDBe annotation documents against the published JSON schema
//! and deposits, retrieves or deletes them through the FunPDBe REST API.
//!
//! # Example
//!
//! ```
//! use funpdbe_client::{normalize, validate};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["pdb_id", "data_resource", "sites"]
//! });
//! let mut document = json!({
//!     "pdb_id": "1CBS",
//!     "data_resource": "nod",
//!     "sites": [{ "source_database": "PDB" }, {}]
//! });
//!
//! assert!(validate(Some(&document), Some(&schema)));
//! assert!(!validate(Some(&document), None));
//!
//! normalize(&mut document);
//! assert_eq!(document["pdb_id"], "1cbs");
//! assert_eq!(document["sites"][0]["source_database"], "pdb");
//! ```
//!
//! # Endpoints
//!
//! | Operation | Method | Path | Success |
//! |-----------|--------|------|---------|
//! | list entries | `GET` | `resource/{resource}/` | `200` |
//! | get entry | `GET` | `resource/{resource}/{pdb_id}/` | `200` |
//! | create | `POST` | `resource/{resource}/` | `201` |
//! | overwrite | `POST` | `resource/{resource}/{pdb_id}/` | `201` |
//! | delete | `DELETE` | `resource/{resource}/{pdb_id}/` | `301` |
//!
//! Paths are relative to the base URL of an [`ApiTarget`]. Every request
//! uses HTTP basic authentication.

mod batch;
mod checks;
mod client;
mod credentials;
mod document;
mod error;
mod plugin;
mod schema;
mod transport;
mod types;

pub mod logging;

pub use batch::{collect_documents, has_document_suffix, run_batch, validate_batch};
pub use checks::{check_identifier, check_resource, is_known_resource, is_valid_identifier};
pub use client::Client;
pub use credentials::{CredentialProvider, Credentials, PromptCredentials, StaticCredentials};
pub use document::{
    data_resource, load_document, normalize, pdb_id, validate, validate_against_schema,
};
pub use error::{
    FetchError, PreconditionError, SchemaUnavailable, SubmitError, TransportError, ValidateError,
    Violation,
};
pub use plugin::Plugin;
pub use schema::{is_url, FileSchemaSource, SchemaCache, SchemaSource};
pub use transport::{HttpConfig, Transport};
pub use types::{
    ApiTarget, BatchTally, Response, DOCUMENT_SUFFIX, LOG_FILENAME, PDB_ID_FIELD, RESOURCES,
    RESOURCE_FIELD, SCHEMA_URL, STATUS_CREATED, STATUS_DELETED, STATUS_OK,
};

#[cfg(feature = "remote")]
pub use schema::HttpSchemaSource;
#[cfg(feature = "remote")]
pub use transport::HttpTransport;
