//! Maps failed API calls onto a single [`ErrorKind`].
//!
//! Inputs are the HTTP status, the response body and an optional transport
//! failure. Classification never performs I/O and always yields exactly one
//! kind, so identical inputs produce identical results.
//!
//! Error codes follow the `ERR::<RESOURCE>::<NAME>` shape. Rules, first match
//! wins:
//!
//! 1. Domain resources (`PROXY`, `ASP`, `SCHEDULE`, `WEBHOOK`, `SESSION`,
//!    `SCREENSHOT`, `EXTRACTION`) map to their own kind whatever the status.
//! 2. Codes naming the scraped website (`UPSTREAM`) map to upstream client or
//!    server errors by status range.
//! 3. Other 4xx responses are refined into bad key, quota, rate limit and
//!    scrape config errors.
//! 4. Remaining `SCRAPE` codes are scrape failures.
//! 5. Remaining 4xx/5xx responses are API client/server errors.
//! 6. Anything else is unhandled.

use serde::Deserialize;

use crate::error::{ApiError, Attribution, ErrorKind, ScrapflyError, TransportFailure};
use crate::result::{ResultError, ScrapeResult};

/// Error body as sent by the API. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    http_code: Option<u16>,
    #[serde(default)]
    doc_url: Option<String>,
    #[serde(default)]
    documentation_url: Option<String>,
    #[serde(default)]
    retry_after_ms: Option<u64>,
    #[serde(default)]
    hint: Option<String>,
}

/// A parsed `ERR::<RESOURCE>::<NAME>` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ErrorCode<'a> {
    resource: &'a str,
    name: &'a str,
}

impl<'a> ErrorCode<'a> {
    fn parse(code: &'a str) -> Option<Self> {
        let mut parts = code.trim().splitn(3, "::");
        match (parts.next(), parts.next(), parts.next()) {
            (Some("ERR"), Some(resource), name) if !resource.is_empty() => Some(Self {
                resource,
                name: name.unwrap_or_default(),
            }),
            _ => None,
        }
    }

    fn is_upstream(&self) -> bool {
        self.resource == "UPSTREAM"
            || self.name == "BAD_UPSTREAM_RESPONSE"
            || self.name.starts_with("UPSTREAM_")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusRange {
    Client,
    Server,
    Other,
}

impl StatusRange {
    fn of(status: u16) -> Self {
        match status {
            400..=499 => StatusRange::Client,
            500..=599 => StatusRange::Server,
            _ => StatusRange::Other,
        }
    }
}

fn domain_kind(code: ErrorCode<'_>) -> Option<ErrorKind> {
    match code.resource {
        "PROXY" => Some(ErrorKind::ProxyFailed),
        "ASP" => Some(ErrorKind::AspBypassFailed),
        "SCHEDULE" => Some(ErrorKind::ScheduleFailed),
        "WEBHOOK" => Some(ErrorKind::WebhookFailed),
        "SESSION" => Some(ErrorKind::SessionFailed),
        "SCREENSHOT" => Some(ErrorKind::ScreenshotApiFailed),
        "EXTRACTION" => Some(ErrorKind::ExtractionApiFailed),
        _ => None,
    }
}

/// Refinements of API-side 4xx errors.
fn client_refinement(status: u16, code: Option<ErrorCode<'_>>) -> Option<ErrorKind> {
    if let Some(code) = code {
        if code.resource == "AUTH" || matches!(code.name, "INVALID_API_KEY" | "BAD_API_KEY") {
            return Some(ErrorKind::BadApiKey);
        }
        if code.name.contains("QUOTA") {
            return Some(ErrorKind::QuotaLimitReached);
        }
        if code.resource == "THROTTLE"
            || code.name.starts_with("THROTTLE")
            || code.name.contains("TOO_MANY")
        {
            return Some(ErrorKind::TooManyRequests);
        }
        if code.resource == "SCRAPE"
            && (code.name.starts_with("INVALID_") || code.name.ends_with("_CONFIG"))
        {
            return Some(ErrorKind::ScrapeConfig);
        }
    }
    match status {
        401 => Some(ErrorKind::BadApiKey),
        429 => Some(ErrorKind::TooManyRequests),
        _ => None,
    }
}

/// The decision table: pick the kind for an effective status and error code.
///
/// `code` may be empty or in an unexpected format; it is then ignored and
/// only the status range is used.
pub fn kind_for(status: u16, code: &str) -> ErrorKind {
    let code = ErrorCode::parse(code);
    if let Some(kind) = code.and_then(domain_kind) {
        return kind;
    }

    let range = StatusRange::of(status);
    if code.is_some_and(|c| c.is_upstream()) {
        match range {
            StatusRange::Client => return ErrorKind::UpstreamClient,
            StatusRange::Server => return ErrorKind::UpstreamServer,
            StatusRange::Other => {}
        }
    }

    if range == StatusRange::Client {
        if let Some(kind) = client_refinement(status, code) {
            return kind;
        }
    }

    if code.is_some_and(|c| c.resource == "SCRAPE") {
        return ErrorKind::ScrapeFailed;
    }

    match range {
        StatusRange::Client => ErrorKind::ApiClient,
        StatusRange::Server => ErrorKind::ApiServer,
        StatusRange::Other => ErrorKind::UnhandledApiResponse,
    }
}

/// Classify a failed call.
///
/// When `transport` is set the body is not looked at: the call never got a
/// response worth reading.
pub fn classify(status: u16, body: &[u8], transport: Option<&TransportFailure>) -> ScrapflyError {
    if let Some(failure) = transport {
        return classify_transport(failure);
    }

    let value = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(_) => {
            return ScrapflyError::unhandled("error payload is not a JSON object", status, body);
        }
        Err(e) => {
            return ScrapflyError::unhandled(
                format!("error payload is not valid JSON: {e}"),
                status,
                body,
            );
        }
    };

    // Scrape failures carry the full scrape envelope next to the error.
    let api_response = value
        .get("result")
        .filter(|r| r.is_object())
        .and_then(|_| serde_json::from_value::<ScrapeResult>(value.clone()).ok());

    let payload: ErrorPayload = match serde_json::from_value(value) {
        Ok(p) => p,
        Err(e) => {
            return ScrapflyError::unhandled(format!("malformed error payload: {e}"), status, body);
        }
    };

    // Scrape failures may only carry the error inside the result section.
    let nested = api_response
        .as_ref()
        .and_then(|r| r.result.error.clone())
        .filter(|_| payload.code.is_none());

    let (message, code, http_code, doc_url, retry_after_ms, hint) = match nested {
        Some(err) => (
            Some(err.message),
            Some(err.code),
            Some(err.http_code),
            err.doc_url.or(err.documentation_url),
            err.retry_after_ms,
            err.hint,
        ),
        None => (
            payload.message,
            payload.code,
            payload.http_code,
            payload.doc_url.or(payload.documentation_url),
            payload.retry_after_ms,
            payload.hint,
        ),
    };

    let effective = http_code.filter(|c| *c != 0).unwrap_or(status);
    let code = code.unwrap_or_default();
    let kind = kind_for(effective, &code);

    let detail = ApiError {
        message: message.unwrap_or_else(|| kind.description().to_string()),
        code,
        http_status_code: effective,
        documentation_url: doc_url.unwrap_or_default(),
        retry_after_ms: rate_limit_hint(kind, retry_after_ms),
        hint: hint.unwrap_or_default(),
        api_response: api_response.map(Box::new),
        raw_body: (kind == ErrorKind::UnhandledApiResponse)
            .then(|| String::from_utf8_lossy(body).into_owned()),
    };
    ScrapflyError::new(kind, detail)
}

/// Classify a call that failed below HTTP.
pub fn classify_transport(failure: &TransportFailure) -> ScrapflyError {
    let kind = match failure.attribution() {
        Attribution::Target => ErrorKind::ProxyFailed,
        Attribution::ApiHost => ErrorKind::UpstreamServer,
    };
    ScrapflyError::new(
        kind,
        ApiError::new(failure.to_string())
            .with_code(failure.code())
            .with_status(0),
    )
}

/// Classify the error embedded in a scrape result that reported failure.
///
/// The upstream status of the result is used when the error has none.
pub fn classify_embedded(error: &ResultError, result: ScrapeResult) -> ScrapflyError {
    let status = if error.http_code != 0 {
        error.http_code
    } else {
        result.result.status_code
    };
    let kind = kind_for(status, &error.code);
    let detail = ApiError {
        message: error.message.clone(),
        code: error.code.clone(),
        http_status_code: status,
        documentation_url: error.docs_url().unwrap_or_default().to_string(),
        retry_after_ms: rate_limit_hint(kind, error.retry_after_ms),
        hint: error.hint.clone().unwrap_or_default(),
        api_response: Some(Box::new(result)),
        raw_body: None,
    };
    ScrapflyError::new(kind, detail)
}

fn rate_limit_hint(kind: ErrorKind, retry_after_ms: Option<u64>) -> u64 {
    if kind == ErrorKind::TooManyRequests {
        retry_after_ms.unwrap_or(0)
    } else {
        0
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
