//! CSS selection over scraped pages.

use scraper::{ElementRef, Html, Selector};
use scrapfly_core::{ScrapeResult, ScrapflyError};

/// Parse the content of a scrape result as an HTML document.
pub fn parse(result: &ScrapeResult) -> Html {
    Html::parse_document(result.content())
}

/// Compile a CSS selector. Invalid selectors become a scrape config error.
pub fn selector(css: &str) -> Result<Selector, ScrapflyError> {
    Selector::parse(css)
        .map_err(|e| ScrapflyError::scrape_config(format!("invalid CSS selector '{css}': {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-normalized text of every element matching `css`.
pub fn select_text(html: &Html, css: &str) -> Result<Vec<String>, ScrapflyError> {
    let selector = selector(css)?;
    Ok(html.select(&selector).map(element_text).collect())
}

/// Value of `attr` on every matching element that has it.
pub fn select_attr(html: &Html, css: &str, attr: &str) -> Result<Vec<String>, ScrapflyError> {
    let selector = selector(css)?;
    Ok(html
        .select(&selector)
        .filter_map(|e| e.value().attr(attr))
        .map(str::to_string)
        .collect())
}

/// Document `<title>`, if present and non-empty.
pub fn title(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    html.select(&selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[path = "tests/html_tests.rs"]
mod tests;
