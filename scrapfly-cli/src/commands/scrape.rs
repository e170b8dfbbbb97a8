use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use scrapfly_client::dispatch::{dispatch, effective_concurrency};
use scrapfly_client::screenshot::sanitize_file_name;
use scrapfly_core::{Format, ScrapeConfig, ScrapeResult};

use super::{Connection, describe_error, runtime};
use crate::error::CliError;

#[derive(Args)]
pub(crate) struct ScrapeArgs {
    /// URLs to scrape
    #[arg(required = true)]
    urls: Vec<String>,

    /// Maximum requests in flight (0 = one per URL; default from config)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Render the page in a headless browser
    #[arg(long)]
    render_js: bool,

    /// Enable anti-scraping protection bypass
    #[arg(long)]
    asp: bool,

    /// Proxy country code (e.g., us, de, fr)
    #[arg(long)]
    country: Option<String>,

    /// Output format: raw, clean_html, json, markdown, text
    #[arg(short, long, value_parser = parse_format)]
    format: Option<Format>,

    /// Write each page's content to this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<Format, String> {
    Format::parse(s).ok_or_else(|| {
        format!("unknown format '{s}' (expected raw, clean_html, json, markdown or text)")
    })
}

impl ScrapeArgs {
    fn to_config(&self, url: &str) -> ScrapeConfig {
        ScrapeConfig {
            render_js: self.render_js,
            asp: self.asp,
            country: self.country.clone(),
            format: self.format,
            ..ScrapeConfig::new(url)
        }
    }
}

/// File extension for scraped content in `format`.
fn content_extension(format: Option<Format>) -> &'static str {
    match format {
        None | Some(Format::Raw) | Some(Format::CleanHtml) => "html",
        Some(Format::Json) => "json",
        Some(Format::Markdown) => "md",
        Some(Format::Text) => "txt",
    }
}

fn output_path(dir: &Path, url: &str, format: Option<Format>) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_file_name(url), content_extension(format)))
}

fn write_content(dir: &Path, result: &ScrapeResult, url: &str, format: Option<Format>) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir)?;
    let path = output_path(dir, url, format);
    std::fs::write(&path, result.content())?;
    Ok(path)
}

/// Run the scrape command.
pub(crate) fn run_scrape(conn: &Connection, args: ScrapeArgs) -> Result<(), CliError> {
    let client = Arc::new(conn.client()?);
    let configs: Vec<ScrapeConfig> = args.urls.iter().map(|u| args.to_config(u)).collect();
    let total = configs.len();
    let concurrency = args.concurrency.unwrap_or(client.config().concurrency);

    log::info!(
        "Scraping {} URL(s) with {} worker(s)",
        total,
        effective_concurrency(concurrency, total),
    );

    let pb = if conn.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {elapsed_precise} {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    };

    let started = Instant::now();
    let rt = runtime()?;
    let failed = rt.block_on(async {
        let mut batch = dispatch(client, configs, concurrency);
        let mut failed = 0usize;

        while let Some(outcome) = batch.recv().await {
            pb.inc(1);
            let url = &outcome.config.url;
            match &outcome.result {
                Ok(result) => {
                    let saved = match &args.output_dir {
                        Some(dir) => match write_content(dir, result, url, args.format) {
                            Ok(path) => Some(path),
                            Err(e) => {
                                pb.suspend(|| {
                                    log::warn!(
                                        "  {} Failed to write output for {}: {}",
                                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                                        url,
                                        e,
                                    )
                                });
                                None
                            }
                        },
                        None => None,
                    };
                    pb.suspend(|| {
                        log::info!(
                            "  {} {} {} ({} bytes){}",
                            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                            url.if_supports_color(Stdout, |t| t.cyan()),
                            result.upstream_status(),
                            result.content().len(),
                            saved
                                .map(|p| format!(" -> {}", p.display()))
                                .unwrap_or_default(),
                        )
                    });
                }
                Err(e) => {
                    failed += 1;
                    pb.suspend(|| {
                        log::warn!(
                            "  {} {} {}",
                            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                            url.if_supports_color(Stdout, |t| t.cyan()),
                            describe_error(e),
                        )
                    });
                }
            }
        }
        failed
    });
    pb.finish_and_clear();

    log::info!("");
    log::info!(
        "{} {} succeeded, {} failed in {:.1}s",
        "Summary:".if_supports_color(Stdout, |t| t.bold()),
        (total - failed).if_supports_color(Stdout, |t| t.green()),
        failed.if_supports_color(Stdout, |t| t.red()),
        started.elapsed().as_secs_f64(),
    );

    if failed > 0 {
        return Err(CliError::Batch { failed, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("markdown"), Ok(Format::Markdown));
        assert_eq!(parse_format("clean_html"), Ok(Format::CleanHtml));
        assert!(parse_format("pdf").unwrap_err().contains("pdf"));
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), "https://web-scraping.dev/product/1", Some(Format::Markdown));
        assert_eq!(path, Path::new("out").join("web-scraping.dev_product_1.md"));
        assert_eq!(content_extension(None), "html");
        assert_eq!(content_extension(Some(Format::Text)), "txt");
    }

    #[test]
    fn test_to_config() {
        let args = ScrapeArgs {
            urls: vec!["https://web-scraping.dev/".into()],
            concurrency: None,
            render_js: true,
            asp: false,
            country: Some("de".into()),
            format: Some(Format::Json),
            output_dir: None,
        };
        let config = args.to_config(&args.urls[0]);
        assert!(config.render_js);
        assert!(!config.asp);
        assert_eq!(config.country.as_deref(), Some("de"));
        assert_eq!(config.format, Some(Format::Json));
        assert_eq!(config.url, "https://web-scraping.dev/");
    }
}
