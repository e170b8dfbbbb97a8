use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level response envelope from the `/scrape` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    #[serde(default)]
    pub uuid: String,
    pub result: ResultData,
    /// The configuration as the API understood it.
    #[serde(default)]
    pub config: serde_json::Value,
    /// Execution context (proxy, ASP, cost, session, ...).
    #[serde(default)]
    pub context: serde_json::Value,
}

impl ScrapeResult {
    /// Final page content.
    pub fn content(&self) -> &str {
        &self.result.content
    }

    /// Status code returned by the scraped website.
    pub fn upstream_status(&self) -> u16 {
        self.result.status_code
    }

    /// Whether the API reported the scrape as failed with an error attached.
    pub fn embedded_error(&self) -> Option<&ResultError> {
        if self.result.success {
            None
        } else {
            self.result.error.as_ref()
        }
    }
}

/// The `result` section of a scrape response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response_headers: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub log_url: Option<String>,
    #[serde(default)]
    pub error: Option<ResultError>,
    #[serde(default)]
    pub extracted_data: Option<serde_json::Value>,
}

/// Error attached to a scrape result that did not succeed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub http_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    /// Older spelling of `doc_url`; some payloads carry both.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub retryable: bool,
    #[serde(default)]
    pub retry_after_ms: Option<u64>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ResultError {
    /// Documentation link, preferring `doc_url`.
    pub fn docs_url(&self) -> Option<&str> {
        self.doc_url.as_deref().or(self.documentation_url.as_deref())
    }
}

/// Binary response from the `/screenshot` endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenshotResult {
    pub image: Vec<u8>,
    pub content_type: String,
    /// Page that was captured, as reported by the API.
    pub url: String,
}

impl ScreenshotResult {
    /// File extension matching the image content type.
    pub fn extension(&self) -> &'static str {
        let mime = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        match mime {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/jpeg" | "image/jpg" => "jpg",
            _ => "bin",
        }
    }
}

/// JSON response from the `/extraction` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub content_type: String,
}
