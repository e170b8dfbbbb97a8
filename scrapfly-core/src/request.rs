use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ScrapflyError};

/// HTTP method used to call the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Methods that may carry a request body.
    pub fn allows_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The API operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestKind {
    #[default]
    Scrape,
    Screenshot,
    Extraction,
    Account,
}

impl RequestKind {
    /// Endpoint path, relative to the API host.
    pub fn path(&self) -> &'static str {
        match self {
            RequestKind::Scrape => "/scrape",
            RequestKind::Screenshot => "/screenshot",
            RequestKind::Extraction => "/extraction",
            RequestKind::Account => "/account",
        }
    }

    /// Kind reported when a config of this operation fails validation.
    pub fn config_error_kind(&self) -> ErrorKind {
        match self {
            RequestKind::Scrape | RequestKind::Account => ErrorKind::ScrapeConfig,
            RequestKind::Screenshot => ErrorKind::ScreenshotConfig,
            RequestKind::Extraction => ErrorKind::ExtractionConfig,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Scrape => write!(f, "scrape"),
            RequestKind::Screenshot => write!(f, "screenshot"),
            RequestKind::Extraction => write!(f, "extraction"),
            RequestKind::Account => write!(f, "account"),
        }
    }
}

/// An endpoint-relative request, before host and API key are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub kind: RequestKind,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(kind: RequestKind, method: HttpMethod) -> Self {
        Self {
            kind,
            method,
            ..Self::default()
        }
    }

    pub fn param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.push((name.into(), value.into()));
    }

    /// Add `name=true` when `flag` is set.
    pub fn flag(&mut self, name: &str, flag: bool) {
        if flag {
            self.param(name, "true");
        }
    }

    pub fn opt_param(&mut self, name: &str, value: Option<impl ToString>) {
        if let Some(v) = value {
            self.param(name, v.to_string());
        }
    }

    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// First query value for `name`.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A raw HTTP response as received from the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are stored lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// A configuration that can be turned into exactly one API call.
///
/// Implemented by every request config. The executor validates, builds the
/// request, performs it once and hands successful responses to [`decode`].
///
/// [`decode`]: ApiOperation::decode
pub trait ApiOperation: Send + Sync + 'static {
    type Output: Send + 'static;

    const KIND: RequestKind;

    /// Local checks, run before any network I/O.
    fn validate(&self) -> Result<(), ScrapflyError>;

    fn to_request(&self) -> Result<ApiRequest, ScrapflyError>;

    /// Decode a 2xx response.
    fn decode(&self, response: &RawResponse) -> Result<Self::Output, ScrapflyError>;

    /// Short label for logs, usually the target URL.
    fn label(&self) -> &str {
        ""
    }
}
