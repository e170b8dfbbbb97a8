use std::path::{Path, PathBuf};

use clap::Args;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use scrapfly_client::save_screenshot;
use scrapfly_core::{ScreenshotConfig, ScreenshotFormat, ScreenshotResult};

use super::{Connection, runtime, spinner};
use crate::error::CliError;

#[derive(Args)]
pub(crate) struct ScreenshotArgs {
    /// Page to capture
    url: String,

    /// Image format: jpg, png, webp, gif
    #[arg(short, long, value_parser = parse_screenshot_format)]
    format: Option<ScreenshotFormat>,

    /// What to capture: viewport, fullpage, or a CSS selector
    #[arg(long)]
    capture: Option<String>,

    /// Output file (default: <sanitized url>.<ext> in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_screenshot_format(s: &str) -> Result<ScreenshotFormat, String> {
    ScreenshotFormat::parse(s)
        .ok_or_else(|| format!("unknown image format '{s}' (expected jpg, png, webp or gif)"))
}

fn write_image(shot: &ScreenshotResult, url: &str, output: Option<&Path>) -> Result<PathBuf, CliError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &shot.image)?;
            Ok(path.to_path_buf())
        }
        None => Ok(save_screenshot(shot, Path::new("."), url)?),
    }
}

/// Run the screenshot command.
pub(crate) fn run_screenshot(conn: &Connection, args: ScreenshotArgs) -> Result<(), CliError> {
    let client = conn.client()?;
    let config = ScreenshotConfig {
        format: args.format,
        capture: args.capture.clone(),
        ..ScreenshotConfig::new(args.url.as_str())
    };

    let pb = spinner(format!("Capturing {}...", args.url), conn.quiet);
    let rt = runtime()?;
    let result = rt.block_on(client.screenshot(&config));
    pb.finish_and_clear();
    let shot = result?;

    let path = write_image(&shot, &args.url, args.output.as_deref())?;
    log::info!(
        "{} Saved {} ({} bytes, {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        shot.image.len(),
        shot.content_type,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_screenshot_format() {
        assert_eq!(parse_screenshot_format("png"), Ok(ScreenshotFormat::Png));
        assert_eq!(parse_screenshot_format("jpeg"), Ok(ScreenshotFormat::Jpg));
        assert!(parse_screenshot_format("bmp").is_err());
    }
}
