pub(crate) mod account;
pub(crate) mod config;
pub(crate) mod extract;
pub(crate) mod scrape;
pub(crate) mod screenshot;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use scrapfly_client::settings::ENV_KEY;
use scrapfly_client::{ClientConfig, ScrapflyClient};
use scrapfly_core::{ErrorKind, ScrapflyError};

use crate::error::CliError;

/// Global connection flags shared by every API command.
pub(crate) struct Connection {
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub quiet: bool,
}

impl Connection {
    /// Load settings, apply command-line overrides and build a client.
    pub(crate) fn client(&self) -> Result<ScrapflyClient, CliError> {
        let config = ClientConfig::load()?.with_overrides(self.api_key.clone(), self.host.clone());
        if config.api_key.is_empty() {
            return Err(CliError::config(format!(
                "no API key set. Export {} or run 'scrapfly config set-key <KEY>'",
                ENV_KEY
            )));
        }
        log::debug!("Using API host {}", config.host);
        Ok(ScrapflyClient::new(config)?)
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))
}

/// Spinner shown while a single request is in flight.
pub(crate) fn spinner(msg: impl Into<String>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("/-\\|"));
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One-line description of a failure: kind, code and message, plus the
/// retry delay when the API sent one.
pub(crate) fn describe_error(e: &ScrapflyError) -> String {
    let detail = e.detail();
    let mut line = format!(
        "{} ({})",
        e.kind().if_supports_color(Stdout, |t| t.red()),
        if detail.code.is_empty() { "no code" } else { &detail.code },
    );
    if !detail.message.is_empty() {
        line.push_str(": ");
        line.push_str(&detail.message);
    }
    if detail.http_status_code != 0 {
        line.push_str(&format!(" [HTTP {}]", detail.http_status_code));
    }
    if let Some(delay) = e.retry_after() {
        line.push_str(&format!(", retry after {:.1}s", delay.as_secs_f64()));
    }
    if e.is(ErrorKind::BadApiKey) {
        line.push_str(&format!(". Check {} or 'scrapfly config show'", ENV_KEY));
    }
    line
}

pub(crate) fn mask_value(s: &str) -> String {
    if s.len() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(8).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value(""), "****");
        assert_eq!(mask_value("scp-live"), "****");
        assert_eq!(mask_value("scp-live-0123456789"), "scp-live****");
    }

    #[test]
    fn test_describe_error() {
        let e = ScrapflyError::new(
            ErrorKind::TooManyRequests,
            scrapfly_core::ApiError::new("slow down")
                .with_code("ERR::THROTTLE::MAX_REQUEST_RATE_EXCEEDED")
                .with_status(429),
        );
        let line = describe_error(&e);
        assert!(line.contains("ERR::THROTTLE::MAX_REQUEST_RATE_EXCEEDED"));
        assert!(line.contains("slow down"));
        assert!(line.contains("[HTTP 429]"));
    }
}
