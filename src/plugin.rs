//! Library entry point for pushing one in-memory document.
//!
//! Pipelines that produce FunPDBe documents can deposit them without writing
//! files first. The resource and PDB identifier are read from the document's
//! own `data_resource` and `pdb_id` fields.
//!
//! ```no_run
//! use funpdbe_client::Plugin;
//! use serde_json::json;
//!
//! let document = json!({
//!     "data_resource": "nod",
//!     "pdb_id": "1CBS",
//!     "sites": []
//! });
//! let plugin = Plugin::new("user", "password", document).unwrap();
//! match plugin.post(false) {
//!     Ok(response) => println!("created: {}", response.body),
//!     Err(e) => eprintln!("POSTing failed: {}", e),
//! }
//! ```

use serde_json::Value;

use crate::client::Client;
use crate::credentials::StaticCredentials;
use crate::document::{data_resource, pdb_id};
use crate::error::{PreconditionError, SubmitError};
use crate::schema::SchemaCache;
use crate::transport::Transport;
use crate::types::{ApiTarget, Response};

#[cfg(feature = "remote")]
use crate::types::SCHEMA_URL;

#[cfg(feature = "remote")]
use crate::transport::{HttpConfig, HttpTransport};

/// One document plus everything needed to POST it.
pub struct Plugin {
    username: String,
    password: String,
    document: Value,
    transport: Box<dyn Transport>,
    schema: SchemaCache,
    api_url: String,
}

impl Plugin {
    /// Prepare a document for the production API over HTTP.
    #[cfg(feature = "remote")]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        document: Value,
    ) -> Result<Self, SubmitError> {
        let config = HttpConfig::default();
        let transport = HttpTransport::new(&config)?;
        let schema = SchemaCache::for_location(SCHEMA_URL, &config)
            .map_err(crate::error::SchemaUnavailable::from)?;
        Ok(Self::with_transport(
            username,
            password,
            document,
            Box::new(transport),
            schema,
        ))
    }

    /// Prepare a document using the given transport and schema cache.
    pub fn with_transport(
        username: impl Into<String>,
        password: impl Into<String>,
        document: Value,
        transport: Box<dyn Transport>,
        schema: SchemaCache,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            document,
            transport,
            schema,
            api_url: ApiTarget::default().base_url().to_string(),
        }
    }

    /// Use another base URL for the deposition API.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// The document's `data_resource`.
    pub fn resource(&self) -> Option<&str> {
        data_resource(&self.document)
    }

    /// The document's `pdb_id`.
    pub fn pdb_id(&self) -> Option<&str> {
        pdb_id(&self.document)
    }

    /// Check that credentials, document, resource and identifier are all present.
    pub fn check(&self) -> Result<(), PreconditionError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(PreconditionError::MissingCredentials);
        }
        match &self.document {
            Value::Object(fields) if !fields.is_empty() => {}
            _ => return Err(PreconditionError::MissingDocument),
        }
        if self.resource().map_or(true, str::is_empty) {
            return Err(PreconditionError::MissingResource);
        }
        if self.pdb_id().map_or(true, str::is_empty) {
            return Err(PreconditionError::MissingIdentifier);
        }
        Ok(())
    }

    /// Validate and POST the document, replacing an existing entry if
    /// `overwrite` is set.
    pub fn post(self, overwrite: bool) -> Result<Response, SubmitError> {
        if let Err(e) = self.check() {
            tracing::error!(error = %e, "POSTing failed due to missing information");
            return Err(e.into());
        }
        let resource = self.resource().map(str::to_string);

        let credentials = StaticCredentials::new(self.username, self.password);
        let mut client = Client::new(self.transport, Box::new(credentials), self.schema)
            .with_api_url(self.api_url);
        client.post_document(self.document, resource.as_deref(), overwrite)
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("username", &self.username)
            .field("resource", &self.resource())
            .field("pdb_id", &self.pdb_id())
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}
