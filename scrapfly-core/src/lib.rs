//! Core types for the Scrapfly web scraping API.
//!
//! Everything here is free of I/O: request configs and their validation and
//! query encoding, response envelopes and their decoding, the error taxonomy
//! and the classifier that maps failed calls onto it, and the JS scenario
//! builder. The `scrapfly-client` crate performs the actual HTTP calls.

pub mod account;
pub mod classify;
pub mod decode;
pub mod error;
pub mod extraction_config;
pub mod request;
pub mod result;
pub mod scenario;
pub mod scrape_config;
pub mod screenshot_config;

pub use account::{AccountData, AccountRequest};
pub use classify::{classify, classify_embedded, classify_transport, kind_for};
pub use decode::{decode_account, decode_extraction, decode_scrape, decode_screenshot};
pub use error::{ApiError, Attribution, ErrorKind, ScrapflyError, TransportFailure};
pub use extraction_config::ExtractionConfig;
pub use request::{ApiOperation, ApiRequest, HttpMethod, RawResponse, RequestKind};
pub use result::{ExtractionResult, ResultData, ResultError, ScrapeResult, ScreenshotResult};
pub use scenario::{
    ConditionAction, ScenarioBuilder, ScenarioStep, SelectorState, encode_scenario,
};
pub use scrape_config::{Format, ProxyPool, ScrapeConfig};
pub use screenshot_config::{ScreenshotConfig, ScreenshotFormat, ScreenshotOption};

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
