//! Request/response model exchanged between the host and the interceptor.
//!
//! These are deliberately small: the interceptor only needs method, URL and
//! headers on the way in and status, headers and body on the way out.

use bytes::Bytes;
use url::Url;

use crate::Error;

/// A request intercepted from a page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Upper-cased HTTP method.
    pub method: String,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers in the order the host supplied them.
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: &str, url: Url) -> Self {
        Self { method: method.to_ascii_uppercase(), url, headers: Vec::new() }
    }

    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// Parse an absolute URL string into a request.
    pub fn parse(method: &str, url: &str) -> Result<Self, Error> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self::new(method, url))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Only idempotent reads are eligible for caching.
    pub fn is_read(&self) -> bool {
        self.method == "GET"
    }

    /// Whether the URL uses a scheme that goes over the network.
    pub fn has_network_scheme(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// A response handed back to the page, from network, cache or synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// Plain-text response with a `content-type` header.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into()).with_header("content-type", "text/plain")
    }

    /// JSON response with a `content-type` header.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string()).with_header("content-type", "application/json")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 2xx statuses are the only ones written into a partition.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The network as seen by the interceptor.
///
/// Implementations must report transport failures as `Err`. An HTTP error
/// status is a successful fetch and comes back as `Ok`.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
