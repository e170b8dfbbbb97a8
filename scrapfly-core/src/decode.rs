//! Decoding of successful API responses.
//!
//! A body that does not have the expected shape never panics: it becomes an
//! [`ErrorKind::UnhandledApiResponse`] error carrying the raw payload.

use serde::de::DeserializeOwned;

use crate::account::AccountData;
use crate::classify;
use crate::error::{ApiError, ErrorKind, ScrapflyError};
use crate::request::RawResponse;
use crate::result::{ExtractionResult, ScrapeResult, ScreenshotResult};

fn decode_json<T: DeserializeOwned>(what: &str, status: u16, body: &[u8]) -> Result<T, ScrapflyError> {
    serde_json::from_slice(body).map_err(|e| {
        ScrapflyError::unhandled(format!("failed to decode {what} response: {e}"), status, body)
    })
}

/// Decode a `/scrape` body into a [`ScrapeResult`].
pub fn decode_scrape(body: &[u8]) -> Result<ScrapeResult, ScrapflyError> {
    decode_json("scrape", 200, body)
}

/// Decode a scrape body and turn a reported scrape failure into an error.
pub fn decode_scrape_outcome(response: &RawResponse) -> Result<ScrapeResult, ScrapflyError> {
    let result: ScrapeResult = decode_json("scrape", response.status, &response.body)?;
    match result.embedded_error().cloned() {
        Some(error) => Err(classify::classify_embedded(&error, result)),
        None => Ok(result),
    }
}

pub fn decode_extraction(body: &[u8]) -> Result<ExtractionResult, ScrapflyError> {
    decode_json("extraction", 200, body)
}

pub fn decode_account(body: &[u8]) -> Result<AccountData, ScrapflyError> {
    decode_json("account", 200, body)
}

/// Wrap a binary `/screenshot` response.
///
/// Anything other than an image is rejected with [`ErrorKind::ContentType`].
pub fn decode_screenshot(response: &RawResponse) -> Result<ScreenshotResult, ScrapflyError> {
    let content_type = response.header("content-type").unwrap_or_default();
    if !content_type.trim_start().starts_with("image/") {
        return Err(ScrapflyError::new(
            ErrorKind::ContentType,
            ApiError::new(format!("expected an image, got content type '{content_type}'"))
                .with_status(response.status),
        ));
    }
    Ok(ScreenshotResult {
        image: response.body.clone(),
        content_type: content_type.to_string(),
        url: response
            .header("x-scrapfly-upstream-url")
            .unwrap_or_default()
            .to_string(),
    })
}

#[cfg(test)]
#[path = "tests/decode_tests.rs"]
mod tests;
