use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;

use crate::decode;
use crate::error::ScrapflyError;
use crate::request::{ApiOperation, ApiRequest, HttpMethod, RawResponse, RequestKind};
use crate::result::ScreenshotResult;
use crate::scrape_config::check_url;

/// Image format of a screenshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScreenshotFormat {
    #[default]
    Jpg,
    Png,
    Webp,
    Gif,
}

impl ScreenshotFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotFormat::Jpg => "jpg",
            ScreenshotFormat::Png => "png",
            ScreenshotFormat::Webp => "webp",
            ScreenshotFormat::Gif => "gif",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ScreenshotFormat::Jpg),
            "png" => Some(ScreenshotFormat::Png),
            "webp" => Some(ScreenshotFormat::Webp),
            "gif" => Some(ScreenshotFormat::Gif),
            _ => None,
        }
    }
}

/// Rendering tweaks applied before capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenshotOption {
    LoadImages,
    DarkMode,
    BlockBanners,
    PrintMediaFormat,
}

impl ScreenshotOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotOption::LoadImages => "load_images",
            ScreenshotOption::DarkMode => "dark_mode",
            ScreenshotOption::BlockBanners => "block_banners",
            ScreenshotOption::PrintMediaFormat => "print_media_format",
        }
    }
}

/// Configuration of a single `/screenshot` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenshotConfig {
    pub url: String,
    pub format: Option<ScreenshotFormat>,
    /// `fullpage`, `viewport` or a CSS selector.
    pub capture: Option<String>,
    /// Viewport size, e.g. `1920x1080`.
    pub resolution: Option<String>,
    pub country: Option<String>,
    pub timeout: Option<u64>,
    pub rendering_wait: Option<u64>,
    pub wait_for_selector: Option<String>,
    pub options: Vec<ScreenshotOption>,
    pub auto_scroll: bool,
    pub js: Option<String>,
    pub cache: bool,
    pub cache_ttl: Option<u64>,
    pub cache_clear: bool,
    pub webhook: Option<String>,
}

impl ScreenshotConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl ApiOperation for ScreenshotConfig {
    type Output = ScreenshotResult;

    const KIND: RequestKind = RequestKind::Screenshot;

    fn validate(&self) -> Result<(), ScrapflyError> {
        check_url(&self.url).map_err(ScrapflyError::screenshot_config)?;
        if !self.cache && (self.cache_ttl.is_some() || self.cache_clear) {
            return Err(ScrapflyError::screenshot_config(
                "cache_ttl and cache_clear require cache to be enabled",
            ));
        }
        if let Some(resolution) = &self.resolution {
            let valid = resolution
                .split_once('x')
                .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
            if !valid {
                return Err(ScrapflyError::screenshot_config(format!(
                    "resolution must look like 1920x1080, got '{resolution}'"
                )));
            }
        }
        Ok(())
    }

    fn to_request(&self) -> Result<ApiRequest, ScrapflyError> {
        let mut req = ApiRequest::new(RequestKind::Screenshot, HttpMethod::Get);
        req.param("url", self.url.as_str());
        req.opt_param("format", self.format.map(|f| f.as_str()));
        req.opt_param("capture", self.capture.as_deref());
        req.opt_param("resolution", self.resolution.as_deref());
        req.opt_param("country", self.country.as_deref());
        req.opt_param("timeout", self.timeout);
        req.opt_param("rendering_wait", self.rendering_wait);
        req.opt_param("wait_for_selector", self.wait_for_selector.as_deref());
        if !self.options.is_empty() {
            let options: Vec<&str> = self.options.iter().map(|o| o.as_str()).collect();
            req.param("options", options.join(","));
        }
        req.flag("auto_scroll", self.auto_scroll);
        if let Some(js) = &self.js {
            req.param("js", URL_SAFE.encode(js.as_bytes()));
        }
        req.flag("cache", self.cache);
        req.opt_param("cache_ttl", self.cache_ttl);
        req.flag("cache_clear", self.cache_clear);
        req.opt_param("webhook_name", self.webhook.as_deref());
        Ok(req)
    }

    fn decode(&self, response: &RawResponse) -> Result<ScreenshotResult, ScrapflyError> {
        let mut result = decode::decode_screenshot(response)?;
        if result.url.is_empty() {
            result.url = self.url.clone();
        }
        Ok(result)
    }

    fn label(&self) -> &str {
        &self.url
    }
}
