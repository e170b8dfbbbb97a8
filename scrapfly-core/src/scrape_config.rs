use std::collections::BTreeMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;

use crate::decode;
use crate::error::ScrapflyError;
use crate::request::{ApiOperation, ApiRequest, HttpMethod, RawResponse, RequestKind};
use crate::result::ScrapeResult;
use crate::scenario::{self, ScenarioStep};

/// Output format of the scraped content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Raw,
    CleanHtml,
    Json,
    Markdown,
    Text,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Raw => "raw",
            Format::CleanHtml => "clean_html",
            Format::Json => "json",
            Format::Markdown => "markdown",
            Format::Text => "text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Some(Format::Raw),
            "clean_html" => Some(Format::CleanHtml),
            "json" => Some(Format::Json),
            "markdown" | "md" => Some(Format::Markdown),
            "text" | "txt" => Some(Format::Text),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proxy network to route the scrape through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyPool {
    PublicDatacenter,
    PublicResidential,
}

impl ProxyPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyPool::PublicDatacenter => "public_datacenter_pool",
            ProxyPool::PublicResidential => "public_residential_pool",
        }
    }
}

/// Configuration of a single `/scrape` call.
///
/// Build it as a struct literal on top of [`ScrapeConfig::new`]:
///
/// ```ignore
/// let config = ScrapeConfig {
///     render_js: true,
///     country: Some("us".into()),
///     ..ScrapeConfig::new("https://example.com")
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeConfig {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub country: Option<String>,
    pub render_js: bool,
    pub asp: bool,
    pub proxy_pool: Option<ProxyPool>,
    pub cache: bool,
    pub cache_ttl: Option<u64>,
    pub cache_clear: bool,
    pub session: Option<String>,
    pub session_sticky_proxy: bool,
    pub wait_for_selector: Option<String>,
    /// Extra wait after page load, in milliseconds.
    pub rendering_wait: Option<u64>,
    pub auto_scroll: bool,
    /// JavaScript to run in the page once rendered.
    pub js: Option<String>,
    pub js_scenario: Option<Vec<ScenarioStep>>,
    /// Named screenshots: name to CSS selector (or `fullpage`).
    pub screenshots: BTreeMap<String, String>,
    pub format: Option<Format>,
    pub tags: Vec<String>,
    /// Let the API retry failed scrapes. Enabled by default.
    pub retry: bool,
    /// Overall API timeout in milliseconds. Requires `retry` to be disabled.
    pub timeout: Option<u64>,
    pub lang: Vec<String>,
    pub os: Option<String>,
    pub correlation_id: Option<String>,
    pub cost_budget: Option<u32>,
    pub webhook: Option<String>,
    pub debug: bool,
    pub ssl: bool,
    pub dns: bool,
    pub proxified_response: bool,
    pub extraction_template: Option<String>,
    pub extraction_prompt: Option<String>,
    pub extraction_model: Option<String>,
}

impl ScrapeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            retry: true,
            ..Self::default()
        }
    }

    fn rendering_options_in_use(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.wait_for_selector.is_some() {
            used.push("wait_for_selector");
        }
        if self.rendering_wait.is_some() {
            used.push("rendering_wait");
        }
        if self.auto_scroll {
            used.push("auto_scroll");
        }
        if self.js.is_some() {
            used.push("js");
        }
        if self.js_scenario.is_some() {
            used.push("js_scenario");
        }
        if !self.screenshots.is_empty() {
            used.push("screenshots");
        }
        used
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let cookies: Vec<String> = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        let existing = self
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("cookie"))
            .map(|(_, v)| v.as_str());
        Some(match existing {
            Some(existing) => format!("{}; {}", existing, cookies.join("; ")),
            None => cookies.join("; "),
        })
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub(crate) fn check_url(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("url is required".to_string());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("url must start with http:// or https://, got '{url}'"));
    }
    Ok(())
}

impl ApiOperation for ScrapeConfig {
    type Output = ScrapeResult;

    const KIND: RequestKind = RequestKind::Scrape;

    fn validate(&self) -> Result<(), ScrapflyError> {
        check_url(&self.url).map_err(ScrapflyError::scrape_config)?;

        if self.body.is_some() && !self.method.allows_body() {
            return Err(ScrapflyError::scrape_config(format!(
                "a request body requires POST, PUT or PATCH, not {}",
                self.method
            )));
        }
        if !self.render_js {
            let used = self.rendering_options_in_use();
            if !used.is_empty() {
                return Err(ScrapflyError::scrape_config(format!(
                    "{} require render_js to be enabled",
                    used.join(", ")
                )));
            }
        }
        if !self.cache && (self.cache_ttl.is_some() || self.cache_clear) {
            return Err(ScrapflyError::scrape_config(
                "cache_ttl and cache_clear require cache to be enabled",
            ));
        }
        if self.session_sticky_proxy && self.session.is_none() {
            return Err(ScrapflyError::scrape_config(
                "session_sticky_proxy requires a session",
            ));
        }
        if self.timeout.is_some() && self.retry {
            return Err(ScrapflyError::scrape_config(
                "timeout can only be set when retry is disabled",
            ));
        }
        let extraction = [
            self.extraction_template.is_some(),
            self.extraction_prompt.is_some(),
            self.extraction_model.is_some(),
        ];
        if extraction.iter().filter(|set| **set).count() > 1 {
            return Err(ScrapflyError::scrape_config(
                "only one of extraction_template, extraction_prompt or extraction_model can be set",
            ));
        }
        Ok(())
    }

    fn to_request(&self) -> Result<ApiRequest, ScrapflyError> {
        let mut req = ApiRequest::new(RequestKind::Scrape, self.method);
        req.param("url", self.url.as_str());
        if !self.retry {
            req.param("retry", "false");
        }
        req.opt_param("country", self.country.as_deref());
        req.flag("asp", self.asp);
        req.opt_param("proxy_pool", self.proxy_pool.map(|p| p.as_str()));

        req.flag("render_js", self.render_js);
        req.opt_param("wait_for_selector", self.wait_for_selector.as_deref());
        req.opt_param("rendering_wait", self.rendering_wait);
        req.flag("auto_scroll", self.auto_scroll);
        if let Some(js) = &self.js {
            req.param("js", URL_SAFE.encode(js.as_bytes()));
        }
        if let Some(steps) = &self.js_scenario {
            req.param("js_scenario", scenario::encode_scenario(steps)?);
        }
        for (name, selector) in &self.screenshots {
            req.param(format!("screenshots[{name}]"), selector.as_str());
        }

        req.flag("cache", self.cache);
        req.opt_param("cache_ttl", self.cache_ttl);
        req.flag("cache_clear", self.cache_clear);
        req.opt_param("session", self.session.as_deref());
        req.flag("session_sticky_proxy", self.session_sticky_proxy);

        req.opt_param("format", self.format.map(|f| f.as_str()));
        if !self.tags.is_empty() {
            req.param("tags", self.tags.join(","));
        }
        req.opt_param("timeout", self.timeout);
        if !self.lang.is_empty() {
            req.param("lang", self.lang.join(","));
        }
        req.opt_param("os", self.os.as_deref());
        req.opt_param("correlation_id", self.correlation_id.as_deref());
        req.opt_param("cost_budget", self.cost_budget);
        req.opt_param("webhook_name", self.webhook.as_deref());
        req.flag("debug", self.debug);
        req.flag("ssl", self.ssl);
        req.flag("dns", self.dns);
        req.flag("proxified_response", self.proxified_response);
        req.opt_param("extraction_template", self.extraction_template.as_deref());
        req.opt_param("extraction_prompt", self.extraction_prompt.as_deref());
        req.opt_param("extraction_model", self.extraction_model.as_deref());

        for (name, value) in &self.headers {
            if self.cookies.is_empty() || !name.eq_ignore_ascii_case("cookie") {
                req.param(format!("headers[{}]", name.to_ascii_lowercase()), value.as_str());
            }
        }
        if let Some(cookie) = self.cookie_header() {
            req.param("headers[cookie]", cookie);
        }

        if let Some(body) = &self.body {
            let content_type = self
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| "application/x-www-form-urlencoded".to_string());
            req.header("content-type", content_type);
            req.body = Some(body.as_bytes().to_vec());
        }
        Ok(req)
    }

    fn decode(&self, response: &RawResponse) -> Result<ScrapeResult, ScrapflyError> {
        decode::decode_scrape_outcome(response)
    }

    fn label(&self) -> &str {
        &self.url
    }
}
