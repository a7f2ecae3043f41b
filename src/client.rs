//! Validate-then-submit pipeline for the FunPDBe deposition API.
//!
//! A submission moves through these steps, stopping at the first failure:
//!
//! 1. the resource name is checked against the registry
//! 2. the document is read from disk (skipped for in-memory documents)
//! 3. the schema is loaded if needed and the document validated against it
//! 4. `pdb_id` and `sites[].source_database` are lower-cased
//! 5. the document is POSTed, either to the resource collection or, when
//!    overwriting, to the entry addressed by its `pdb_id`
//!
//! Steps 1–4 never touch the network apart from the schema fetch. Nothing is
//! retried: a rejected POST may still have had an effect on the server.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::checks::{check_identifier, check_resource};
use crate::credentials::{CredentialProvider, Credentials};
use crate::document::{load_document, normalize, pdb_id, validate_against_schema};
use crate::error::{PreconditionError, SubmitError};
use crate::schema::SchemaCache;
use crate::transport::Transport;
use crate::types::{ApiTarget, Response, STATUS_CREATED, STATUS_DELETED, STATUS_OK};

#[cfg(feature = "remote")]
use crate::transport::{HttpConfig, HttpTransport};

/// Client for one deposition API.
pub struct Client {
    api_url: String,
    transport: Box<dyn Transport>,
    credentials: Box<dyn CredentialProvider>,
    schema: SchemaCache,
}

impl Client {
    /// Create a client talking to the production API.
    pub fn new(
        transport: Box<dyn Transport>,
        credentials: Box<dyn CredentialProvider>,
        schema: SchemaCache,
    ) -> Self {
        Self {
            api_url: ApiTarget::default().base_url().to_string(),
            transport,
            credentials,
            schema,
        }
    }

    /// Create a client using the `reqwest` transport.
    #[cfg(feature = "remote")]
    pub fn http(
        credentials: Box<dyn CredentialProvider>,
        schema: SchemaCache,
        config: &HttpConfig,
    ) -> Result<Self, crate::error::TransportError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Box::new(transport), credentials, schema))
    }

    /// Point the client at another base URL. A trailing `/` is added if missing.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.api_url = url;
        self
    }

    /// Point the client at one of the known deployments.
    pub fn with_api_target(self, target: ApiTarget) -> Self {
        self.with_api_url(target.base_url())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    /// POST the document stored at `path`.
    ///
    /// # Errors
    ///
    /// Any [`SubmitError`]; only `Rejected` and `Transport` happen after a
    /// request was sent.
    pub fn post_file(
        &mut self,
        path: Option<&Path>,
        resource: Option<&str>,
        overwrite: bool,
    ) -> Result<Response, SubmitError> {
        info!(
            path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
            resource = resource.unwrap_or_default(),
            overwrite,
            "POST"
        );
        let resource = checked_resource(resource)?;
        let path = path.ok_or(PreconditionError::MissingPath).map_err(log_local)?;
        let document = load_document(path).map_err(log_local)?;
        self.submit(resource, document, overwrite)
    }

    /// POST an in-memory document (plugin mode).
    pub fn post_document(
        &mut self,
        document: Value,
        resource: Option<&str>,
        overwrite: bool,
    ) -> Result<Response, SubmitError> {
        info!(
            resource = resource.unwrap_or_default(),
            overwrite, "POST in-memory document"
        );
        let resource = checked_resource(resource)?;
        self.submit(resource, document, overwrite)
    }

    fn submit(
        &mut self,
        resource: &str,
        mut document: Value,
        overwrite: bool,
    ) -> Result<Response, SubmitError> {
        self.validate_document(&document)?;
        normalize(&mut document);
        debug!("document normalized");

        let url = if overwrite {
            let id = pdb_id(&document);
            check_identifier(id).map_err(log_local)?;
            self.entry_url(resource, id.unwrap_or_default())
        } else {
            self.collection_url(resource)
        };

        let credentials = self.credentials()?;
        let response = self.transport.post(&url, &document, &credentials)?;
        expect_status(response, STATUS_CREATED)
    }

    /// Validate the document stored at `path` without submitting it.
    pub fn validate_file(&mut self, path: Option<&Path>) -> Result<(), SubmitError> {
        let path = path.ok_or(PreconditionError::MissingPath).map_err(log_local)?;
        let document = load_document(path).map_err(log_local)?;
        self.validate_document(&document)
    }

    /// Validate a document against the FunPDBe schema, fetching it if needed.
    pub fn validate_document(&mut self, document: &Value) -> Result<(), SubmitError> {
        if document.is_null() {
            return Err(log_local(PreconditionError::MissingDocument).into());
        }
        let schema = self.schema.load().map_err(|e| {
            error!(error = %e, "schema unavailable");
            SubmitError::from(e)
        })?;

        match validate_against_schema(schema, document) {
            Ok(()) => {
                info!("JSON complies with FunPDBe schema");
                Ok(())
            }
            Err(e) => {
                let err = SubmitError::from(e);
                error!(error = %err, "JSON does not comply with FunPDBe schema");
                if let SubmitError::SchemaViolation { errors } = &err {
                    for violation in errors {
                        debug!(%violation, "schema violation");
                    }
                }
                Err(err)
            }
        }
    }

    /// GET every entry of a resource.
    ///
    /// The response is returned whatever its status; non-200 answers are
    /// only logged.
    pub fn get_all(&mut self, resource: Option<&str>) -> Result<Response, SubmitError> {
        let resource = checked_resource(resource)?;
        info!(resource, "GET all entries");
        let url = self.collection_url(resource);
        self.get(&url)
    }

    /// GET one entry of a resource.
    pub fn get_one(
        &mut self,
        pdb_id: Option<&str>,
        resource: Option<&str>,
    ) -> Result<Response, SubmitError> {
        let resource = checked_resource(resource)?;
        check_identifier(pdb_id).map_err(log_local)?;
        let pdb_id = pdb_id.unwrap_or_default();
        info!(pdb_id, resource, "GET entry");
        let url = self.entry_url(resource, pdb_id);
        self.get(&url)
    }

    fn get(&mut self, url: &str) -> Result<Response, SubmitError> {
        let credentials = self.credentials()?;
        let response = self.transport.get(url, &credentials)?;
        if response.status == STATUS_OK {
            info!(status = response.status, "success");
        } else {
            error!(status = response.status, body = %response.body, "GET failed");
        }
        Ok(response)
    }

    /// DELETE one entry of a resource.
    ///
    /// The deposition API confirms a delete with `301`; any other status is
    /// a rejection.
    pub fn delete_one(
        &mut self,
        pdb_id: Option<&str>,
        resource: Option<&str>,
    ) -> Result<Response, SubmitError> {
        info!(
            pdb_id = pdb_id.unwrap_or_default(),
            resource = resource.unwrap_or_default(),
            "DELETE entry"
        );
        let resource = checked_resource(resource)?;
        check_identifier(pdb_id).map_err(log_local)?;
        let url = self.entry_url(resource, pdb_id.unwrap_or_default());

        let credentials = self.credentials()?;
        let response = self.transport.delete(&url, &credentials)?;
        expect_status(response, STATUS_DELETED)
    }

    fn credentials(&mut self) -> Result<Credentials, SubmitError> {
        Ok(self.credentials.credentials().map_err(log_local)?)
    }

    fn collection_url(&self, resource: &str) -> String {
        format!("{}resource/{}/", self.api_url, resource)
    }

    fn entry_url(&self, resource: &str, pdb_id: &str) -> String {
        format!("{}resource/{}/{}/", self.api_url, resource, pdb_id)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.api_url)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

fn checked_resource(resource: Option<&str>) -> Result<&str, PreconditionError> {
    check_resource(resource).map_err(log_local)?;
    Ok(resource.unwrap_or_default())
}

fn log_local(err: PreconditionError) -> PreconditionError {
    error!(error = %err, "precondition failed");
    err
}

fn expect_status(response: Response, expected: u16) -> Result<Response, SubmitError> {
    if response.status == expected {
        info!("[{}] SUCCESS", response.status);
        Ok(response)
    } else {
        error!("[{}] FAIL - {}", response.status, response.body);
        Err(SubmitError::Rejected {
            status: response.status,
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use crate::error::{FetchError, TransportError};
    use crate::schema::SchemaSource;

    struct NoTransport;

    impl Transport for NoTransport {
        fn get(&self, url: &str, _: &Credentials) -> Result<Response, TransportError> {
            Err(unreachable_request("GET", url))
        }

        fn post(&self, url: &str, _: &Value, _: &Credentials) -> Result<Response, TransportError> {
            Err(unreachable_request("POST", url))
        }

        fn delete(&self, url: &str, _: &Credentials) -> Result<Response, TransportError> {
            Err(unreachable_request("DELETE", url))
        }
    }

    fn unreachable_request(method: &'static str, url: &str) -> TransportError {
        TransportError::Request {
            method,
            url: url.to_string(),
            message: "offline".to_string(),
        }
    }

    struct NoSchema;

    impl SchemaSource for NoSchema {
        fn fetch(&self, location: &str) -> Result<String, FetchError> {
            Err(FetchError::Unreachable {
                location: location.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    fn client() -> Client {
        Client::new(
            Box::new(NoTransport),
            Box::new(StaticCredentials::new("foo", "bar")),
            SchemaCache::new(Box::new(NoSchema), "schema.json"),
        )
    }

    #[test]
    fn default_api_url_is_production() {
        assert_eq!(client().api_url(), ApiTarget::Prod.base_url());
    }

    #[test]
    fn api_url_gets_trailing_slash() {
        let client = client().with_api_url("http://localhost:8000/entries");
        assert_eq!(client.api_url(), "http://localhost:8000/entries/");
    }

    #[test]
    fn urls() {
        let client = client().with_api_target(ApiTarget::Local);
        assert_eq!(
            client.collection_url("nod"),
            "http://127.0.0.1:8000/entries/resource/nod/"
        );
        assert_eq!(
            client.entry_url("nod", "1abc"),
            "http://127.0.0.1:8000/entries/resource/nod/1abc/"
        );
    }

    #[test]
    fn expect_status_matches() {
        let response = expect_status(Response::new(201, "created"), STATUS_CREATED).unwrap();
        assert_eq!(response.body, "created");

        let err = expect_status(Response::new(400, "bad"), STATUS_CREATED).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected { status: 400, .. }));
    }

    #[test]
    fn unknown_resource_fails_locally() {
        let err = client()
            .post_document(serde_json::json!({}), Some("unknown"), false)
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Precondition(PreconditionError::UnknownResource { .. })
        ));
    }

    #[test]
    fn missing_path_fails_locally() {
        let err = client().post_file(None, Some("nod"), false).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Precondition(PreconditionError::MissingPath)
        ));
    }

    #[test]
    fn unreachable_schema_fails_validation() {
        let err = client()
            .validate_document(&serde_json::json!({ "pdb_id": "1abc" }))
            .unwrap_err();
        assert!(matches!(err, SubmitError::SchemaUnavailable(_)));
    }

    #[test]
    fn null_document_fails_before_schema_fetch() {
        let err = client().validate_document(&Value::Null).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Precondition(PreconditionError::MissingDocument)
        ));
    }

    #[test]
    fn get_one_requires_valid_identifier() {
        let err = client().get_one(Some("0abc"), Some("nod")).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Precondition(PreconditionError::MalformedIdentifier { .. })
        ));
    }
}
