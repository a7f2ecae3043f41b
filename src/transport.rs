//! HTTP transport for the deposition API.
//!
//! The submission engine only needs a status code and a body back from the
//! server, so [`Transport`] is kept that small. [`HttpTransport`] is the
//! `reqwest` implementation used by the command-line client; tests swap in
//! an in-memory fake.

use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::TransportError;
use crate::types::Response;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Blocking GET/POST/DELETE with basic authentication.
pub trait Transport {
    fn get(&self, url: &str, credentials: &Credentials) -> Result<Response, TransportError>;

    fn post(
        &self,
        url: &str,
        body: &Value,
        credentials: &Credentials,
    ) -> Result<Response, TransportError>;

    fn delete(&self, url: &str, credentials: &Credentials) -> Result<Response, TransportError>;
}

/// Settings shared by the HTTP transport and the HTTP schema source.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<std::time::Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("funpdbe-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(feature = "remote")]
impl HttpConfig {
    /// Build a blocking `reqwest` client from these settings.
    ///
    /// Redirects are not followed, so a redirect status reaches the caller
    /// as-is.
    pub(crate) fn build_client(&self) -> Result<reqwest::blocking::Client, reqwest::Error> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
    }

    /// Set a request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// [`Transport`] backed by `reqwest::blocking`.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = config
            .build_client()
            .map_err(|e| TransportError::Build {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn send(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
        credentials: &Credentials,
    ) -> Result<Response, TransportError> {
        let request_error = |e: reqwest::Error| TransportError::Request {
            method,
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = request
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(request_error)?;
        tracing::debug!(method, url, status, "response received");
        Ok(Response { status, body })
    }
}

#[cfg(feature = "remote")]
impl Transport for HttpTransport {
    fn get(&self, url: &str, credentials: &Credentials) -> Result<Response, TransportError> {
        self.send("GET", url, self.client.get(url), credentials)
    }

    fn post(
        &self,
        url: &str,
        body: &Value,
        credentials: &Credentials,
    ) -> Result<Response, TransportError> {
        self.send("POST", url, self.client.post(url).json(body), credentials)
    }

    fn delete(&self, url: &str, credentials: &Credentials) -> Result<Response, TransportError> {
        self.send("DELETE", url, self.client.delete(url), credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_timeout() {
        let config = HttpConfig::default();
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("funpdbe-client/"));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn config_timeout_builder() {
        let config = HttpConfig::default().timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn http_transport_builds() {
        assert!(HttpTransport::new(&HttpConfig::default()).is_ok());
    }
}
