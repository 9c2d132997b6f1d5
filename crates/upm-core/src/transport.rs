//! HTTP transport seam
//!
//! The engine never talks to `reqwest` directly. Every exchange goes through
//! the [`Transport`] trait so that tests can replay scripted responses and
//! callers can wrap the default client with their own middleware.

use crate::error::{MapperError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Network-level failure, before any HTTP status was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}. Check your network connection and the API URL.")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request could not be built (bad URL, bad header)
    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::Request(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Request(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Query string parameters
    pub params: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body fields
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            form: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Value of the first query parameter named `key`
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A fully-buffered response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Header names are stored lowercase
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy; only for error messages and JSON control bodies
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            MapperError::unexpected(format!("invalid JSON body (HTTP {}): {}", self.status, e))
        })
    }
}

/// Sends one HTTP request and buffers the whole response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Default transport backed by `reqwest`
///
/// Response bodies are returned exactly as received: `Content-Encoding` is
/// left for the decoder to honour.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("upm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MapperError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        debug!(method = ?request.method, url = %request.url, "HTTP request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "HTTP response");

        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::post("https://rest.uniprot.org/idmapping/run")
            .form_field("from", "UniProtKB_AC-ID")
            .form_field("to", "Ensembl")
            .param("format", "json");

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.form.len(), 2);
        assert_eq!(request.param_value("format"), Some("json"));
        assert_eq!(request.param_value("size"), None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(200, "{}").with_header("Content-Encoding", "gzip");
        assert_eq!(response.header("content-encoding"), Some("gzip"));
        assert_eq!(response.header("CONTENT-ENCODING"), Some("gzip"));
        assert_eq!(response.header("link"), None);
    }

    #[test]
    fn test_json_body_error_is_unexpected_response() {
        let response = HttpResponse::new(200, "not json");
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, MapperError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_request_errors_are_not_transient() {
        assert!(!TransportError::Request("bad url".into()).is_transient());
        assert!(TransportError::Connect("refused".into()).is_transient());
    }
}
