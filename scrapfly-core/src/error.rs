use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::ScrapeResult;

/// Coarse, stable category of a failed API call.
///
/// Every [`ScrapflyError`] carries exactly one kind. Branch on it with plain
/// equality (`err.kind() == ErrorKind::TooManyRequests`); the attached
/// [`ApiError`] holds the diagnostic detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The API key is missing or was rejected.
    BadApiKey,
    /// Invalid scrape configuration.
    ScrapeConfig,
    /// Invalid screenshot configuration.
    ScreenshotConfig,
    /// Invalid extraction configuration.
    ExtractionConfig,
    /// Content type not valid for the requested operation.
    ContentType,
    /// Rate limited; see [`ApiError::retry_after_ms`].
    TooManyRequests,
    /// Account quota exhausted.
    QuotaLimitReached,
    /// Screenshot API failure.
    ScreenshotApiFailed,
    /// Extraction API failure.
    ExtractionApiFailed,
    /// 4xx returned by the scraped website.
    UpstreamClient,
    /// 5xx returned by the scraped website, or the API host was unreachable.
    UpstreamServer,
    /// 4xx returned by the Scrapfly API itself.
    ApiClient,
    /// 5xx returned by the Scrapfly API itself.
    ApiServer,
    /// The scrape itself failed.
    ScrapeFailed,
    /// Proxy connection failure.
    ProxyFailed,
    /// Anti-scraping protection bypass failed.
    AspBypassFailed,
    /// Scheduled job failure.
    ScheduleFailed,
    /// Webhook delivery failure.
    WebhookFailed,
    /// Browser session failure.
    SessionFailed,
    /// Payload present but not recognized.
    UnhandledApiResponse,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 20] = [
        ErrorKind::BadApiKey,
        ErrorKind::ScrapeConfig,
        ErrorKind::ScreenshotConfig,
        ErrorKind::ExtractionConfig,
        ErrorKind::ContentType,
        ErrorKind::TooManyRequests,
        ErrorKind::QuotaLimitReached,
        ErrorKind::ScreenshotApiFailed,
        ErrorKind::ExtractionApiFailed,
        ErrorKind::UpstreamClient,
        ErrorKind::UpstreamServer,
        ErrorKind::ApiClient,
        ErrorKind::ApiServer,
        ErrorKind::ScrapeFailed,
        ErrorKind::ProxyFailed,
        ErrorKind::AspBypassFailed,
        ErrorKind::ScheduleFailed,
        ErrorKind::WebhookFailed,
        ErrorKind::SessionFailed,
        ErrorKind::UnhandledApiResponse,
    ];

    /// Human-readable description of the kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::BadApiKey => "invalid key, must be a non-empty string",
            ErrorKind::ScrapeConfig => "invalid scrape config",
            ErrorKind::ScreenshotConfig => "invalid screenshot config",
            ErrorKind::ExtractionConfig => "invalid extraction config",
            ErrorKind::ContentType => "invalid content type for this operation",
            ErrorKind::TooManyRequests => "too many requests",
            ErrorKind::QuotaLimitReached => "quota limit reached",
            ErrorKind::ScreenshotApiFailed => "screenshot API error",
            ErrorKind::ExtractionApiFailed => "extraction API error",
            ErrorKind::UpstreamClient => "upstream http client error",
            ErrorKind::UpstreamServer => "upstream http server error",
            ErrorKind::ApiClient => "API http client error",
            ErrorKind::ApiServer => "API http server error",
            ErrorKind::ScrapeFailed => "scrape failed",
            ErrorKind::ProxyFailed => "proxy error",
            ErrorKind::AspBypassFailed => "ASP bypass error",
            ErrorKind::ScheduleFailed => "schedule error",
            ErrorKind::WebhookFailed => "webhook error",
            ErrorKind::SessionFailed => "session error",
            ErrorKind::UnhandledApiResponse => "unhandled API error response",
        }
    }

    /// Local validation failures, raised before any network I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ErrorKind::BadApiKey
                | ErrorKind::ScrapeConfig
                | ErrorKind::ScreenshotConfig
                | ErrorKind::ExtractionConfig
                | ErrorKind::ContentType
        )
    }

    /// Whether retrying the same request later can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::TooManyRequests
                | ErrorKind::UpstreamServer
                | ErrorKind::ApiServer
                | ErrorKind::ProxyFailed
                | ErrorKind::AspBypassFailed
        )
    }

    /// Account-wide conditions that will fail every subsequent request too.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::BadApiKey | ErrorKind::QuotaLimitReached)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Detailed error information returned alongside an [`ErrorKind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiError {
    /// Human-readable error message.
    pub message: String,
    /// Upstream error code, e.g. `ERR::SCRAPE::BAD_UPSTREAM_RESPONSE`.
    pub code: String,
    /// HTTP status the classification was based on (0 for transport failures).
    pub http_status_code: u16,
    /// Link to the relevant documentation page.
    pub documentation_url: String,
    /// Suggested wait before retrying. Only set for rate limiting.
    pub retry_after_ms: u64,
    /// Additional context for resolving the error.
    pub hint: String,
    /// Full scrape response, when the API returned one.
    pub api_response: Option<Box<ScrapeResult>>,
    /// Raw response body, kept when it could not be understood.
    pub raw_body: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status_code = status;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API Error: {} (code: {}, status: {}, docs: {})",
            self.message, self.code, self.http_status_code, self.documentation_url
        )?;
        if self.retry_after_ms > 0 {
            write!(f, ", retry_after_ms: {}", self.retry_after_ms)?;
        }
        Ok(())
    }
}

/// A classified failure: one [`ErrorKind`] plus its [`ApiError`] detail.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {detail}")]
pub struct ScrapflyError {
    kind: ErrorKind,
    detail: Box<ApiError>,
}

impl ScrapflyError {
    pub fn new(kind: ErrorKind, detail: ApiError) -> Self {
        Self {
            kind,
            detail: Box::new(detail),
        }
    }

    /// Shorthand for a kind with only a message.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, ApiError::new(message))
    }

    pub fn bad_api_key(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::BadApiKey, msg)
    }

    pub fn scrape_config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ScrapeConfig, msg)
    }

    pub fn screenshot_config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ScreenshotConfig, msg)
    }

    pub fn extraction_config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ExtractionConfig, msg)
    }

    pub fn content_type(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ContentType, msg)
    }

    /// An unrecognized payload, keeping the raw body for diagnosis.
    pub fn unhandled(msg: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let detail = ApiError {
            raw_body: Some(String::from_utf8_lossy(body).into_owned()),
            ..ApiError::new(msg).with_status(status)
        };
        Self::new(ErrorKind::UnhandledApiResponse, detail)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &ApiError {
        &self.detail
    }

    pub fn into_detail(self) -> ApiError {
        *self.detail
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Backoff hint for rate-limited calls. `None` when the API gave none.
    pub fn retry_after(&self) -> Option<Duration> {
        match self.detail.retry_after_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

/// Which side of the connection a transport failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// Reaching the scraped website (through the proxy layer) failed.
    Target,
    /// Reaching the Scrapfly API host failed.
    ApiHost,
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("proxy connection failed: {0}")]
    Proxy(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportFailure {
    pub fn attribution(&self) -> Attribution {
        match self {
            TransportFailure::Proxy(_) => Attribution::Target,
            _ => Attribution::ApiHost,
        }
    }

    /// Synthetic error code used in the [`ApiError`] detail.
    pub fn code(&self) -> &'static str {
        match self {
            TransportFailure::Connect(_) => "ERR::TRANSPORT::CONNECT",
            TransportFailure::Timeout(_) => "ERR::TRANSPORT::TIMEOUT",
            TransportFailure::Tls(_) => "ERR::TRANSPORT::TLS",
            TransportFailure::Proxy(_) => "ERR::TRANSPORT::PROXY",
            TransportFailure::Cancelled => "ERR::TRANSPORT::CANCELLED",
            TransportFailure::Other(_) => "ERR::TRANSPORT::OTHER",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportFailure::Cancelled)
    }
}
