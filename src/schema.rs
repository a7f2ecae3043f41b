//! FunPDBe schema retrieval and caching.
//!
//! The schema is fetched lazily the first time a document needs validating
//! and then kept for the rest of the process. A failed fetch stores nothing,
//! so the next validation tries again.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{FetchError, SchemaUnavailable};

#[cfg(feature = "remote")]
use crate::transport::HttpConfig;

/// Returns the raw text of a schema.
pub trait SchemaSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// Reads schemas from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSchemaSource;

impl SchemaSource for FileSchemaSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let path = Path::new(location);
        if !path.exists() {
            return Err(FetchError::NotFound {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path).map_err(|e| FetchError::Unreachable {
            location: location.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fetches schemas over HTTP(S), without authentication.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpSchemaSource {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = config
            .build_client()
            .map_err(|e| FetchError::Unreachable {
                location: "HTTP client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "remote")]
impl SchemaSource for HttpSchemaSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let unreachable = |e: reqwest::Error| FetchError::Unreachable {
            location: location.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(location).send().map_err(unreachable)?;

        // Check for HTTP errors before reading the body
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(unreachable)
    }
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Holds at most one schema, fetched on first use.
pub struct SchemaCache {
    source: Box<dyn SchemaSource>,
    location: String,
    schema: Option<Value>,
}

impl SchemaCache {
    /// Create an empty cache that will fetch `location` from `source`.
    pub fn new(source: Box<dyn SchemaSource>, location: impl Into<String>) -> Self {
        Self {
            source,
            location: location.into(),
            schema: None,
        }
    }

    /// Create an empty cache for a file path or URL.
    ///
    /// URLs are fetched over HTTP, anything else is read from disk.
    #[cfg(feature = "remote")]
    pub fn for_location(location: &str, config: &HttpConfig) -> Result<Self, FetchError> {
        if is_url(location) {
            Ok(Self::new(Box::new(HttpSchemaSource::new(config)?), location))
        } else {
            Ok(Self::new(Box::new(FileSchemaSource), location))
        }
    }

    /// Where the schema is fetched from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns true once a schema has been fetched and parsed.
    pub fn is_loaded(&self) -> bool {
        self.schema.is_some()
    }

    /// The cached schema, without fetching.
    pub fn get(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// Return the cached schema, fetching it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns `SchemaUnavailable::Fetch` if the source fails, or
    /// `SchemaUnavailable::Malformed` if its text isn't valid JSON. The cache
    /// stays empty in both cases.
    pub fn load(&mut self) -> Result<&Value, SchemaUnavailable> {
        let schema = match self.schema.take() {
            Some(schema) => schema,
            None => self.fetch()?,
        };
        Ok(self.schema.insert(schema))
    }

    /// Make sure a schema is cached, logging the reason if it cannot be.
    pub fn ensure_loaded(&mut self) -> bool {
        match self.load() {
            Ok(_) => true,
            Err(e) => {
                error!(location = %self.location, error = %e, "schema unavailable");
                false
            }
        }
    }

    fn fetch(&self) -> Result<Value, SchemaUnavailable> {
        debug!(location = %self.location, "getting JSON schema");
        let text = self.source.fetch(&self.location)?;
        serde_json::from_str(&text).map_err(|source| SchemaUnavailable::Malformed {
            location: self.location.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("location", &self.location)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
