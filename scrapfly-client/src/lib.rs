//! Async client for the Scrapfly web scraping API.
//!
//! [`ScrapflyClient`] performs single requests; [`dispatch`] runs a batch of
//! configs concurrently over a worker pool and streams index-tagged outcomes.
//! Failed calls are classified by `scrapfly-core` into a [`ScrapflyError`].

pub mod cancel;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod html;
pub mod screenshot;
pub mod settings;
pub mod transport;
pub mod worker_pool;

pub use cancel::CancelToken;
pub use client::ScrapflyClient;
pub use dispatch::{Dispatch, DispatchOutcome, dispatch, dispatch_with_cancel};
pub use error::ConfigError;
pub use screenshot::save_screenshot;
pub use settings::{ClientConfig, ConfigSource, ConfigSources};
pub use transport::{HttpRequest, ReqwestTransport, Transport};
pub use worker_pool::WorkerPool;

pub use scrapfly_core::*;

#[cfg(test)]
#[path = "tests/mock_transport.rs"]
pub(crate) mod mock_transport;
