use crate::decode;
use crate::error::ScrapflyError;
use crate::request::{ApiOperation, ApiRequest, HttpMethod, RawResponse, RequestKind};
use crate::result::ExtractionResult;

/// Document types the extraction API accepts.
const SUPPORTED_CONTENT_TYPES: &[&str] = &[
    "text/html",
    "text/plain",
    "text/markdown",
    "text/csv",
    "text/xml",
    "application/xml",
    "application/xhtml+xml",
    "application/rss+xml",
    "application/atom+xml",
    "application/json",
    "application/ld+json",
];

/// Configuration of a single `/extraction` call.
///
/// Exactly one of `extraction_template`, `extraction_prompt` or
/// `extraction_model` must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionConfig {
    /// Document to extract from.
    pub body: Vec<u8>,
    /// MIME type of `body`, e.g. `text/html`.
    pub content_type: String,
    /// Original URL of the document, used to resolve relative links.
    pub url: Option<String>,
    pub charset: Option<String>,
    pub extraction_template: Option<String>,
    pub extraction_prompt: Option<String>,
    pub extraction_model: Option<String>,
    pub webhook: Option<String>,
}

impl ExtractionConfig {
    pub fn new(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    /// `content_type` without parameters, lowercased.
    fn mime(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

impl ApiOperation for ExtractionConfig {
    type Output = ExtractionResult;

    const KIND: RequestKind = RequestKind::Extraction;

    fn validate(&self) -> Result<(), ScrapflyError> {
        if self.body.is_empty() {
            return Err(ScrapflyError::extraction_config("body is required"));
        }
        if self.content_type.trim().is_empty() {
            return Err(ScrapflyError::extraction_config("content_type is required"));
        }
        let mime = self.mime();
        if !SUPPORTED_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(ScrapflyError::content_type(format!(
                "content type '{mime}' is not supported for extraction"
            )));
        }
        let set = [
            self.extraction_template.is_some(),
            self.extraction_prompt.is_some(),
            self.extraction_model.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count();
        match set {
            0 => Err(ScrapflyError::extraction_config(
                "one of extraction_template, extraction_prompt or extraction_model is required",
            )),
            1 => Ok(()),
            _ => Err(ScrapflyError::extraction_config(
                "only one of extraction_template, extraction_prompt or extraction_model can be set",
            )),
        }
    }

    fn to_request(&self) -> Result<ApiRequest, ScrapflyError> {
        let mut req = ApiRequest::new(RequestKind::Extraction, HttpMethod::Post);
        req.param("content_type", self.content_type.as_str());
        req.opt_param("url", self.url.as_deref());
        req.opt_param("charset", self.charset.as_deref());
        req.opt_param("extraction_template", self.extraction_template.as_deref());
        req.opt_param("extraction_prompt", self.extraction_prompt.as_deref());
        req.opt_param("extraction_model", self.extraction_model.as_deref());
        req.opt_param("webhook_name", self.webhook.as_deref());
        req.header("content-type", self.content_type.as_str());
        req.body = Some(self.body.clone());
        Ok(req)
    }

    fn decode(&self, response: &RawResponse) -> Result<ExtractionResult, ScrapflyError> {
        decode::decode_extraction(&response.body)
    }

    fn label(&self) -> &str {
        self.url.as_deref().unwrap_or("extraction")
    }
}
