use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use scrapfly_client::settings::{self, ConfigSource};
use scrapfly_client::ClientConfig;

use super::mask_value;
use crate::error::CliError;

/// Show current settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::config_path();
    let sources = settings::config_sources();

    log::info!(
        "{}",
        "Scrapfly Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let config = ClientConfig::load()?;
    let api_key = match sources.api_key {
        ConfigSource::Missing => None,
        _ => Some(mask_value(&config.api_key)),
    };

    let fields: [(&str, &ConfigSource, Option<String>); 5] = [
        ("api_key", &sources.api_key, api_key),
        ("host", &sources.host, Some(config.host.clone())),
        (
            "timeout",
            &sources.timeout,
            Some(format!("{}s", config.timeout.as_secs())),
        ),
        (
            "concurrency",
            &sources.concurrency,
            Some(config.concurrency.to_string()),
        ),
        (
            "verify_ssl",
            &sources.verify_ssl,
            Some(config.verify_ssl.to_string()),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        let label = format!("{}:", name);
        match value {
            Some(v) => log::info!(
                "  {:<13} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {:<13} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = settings::config_path()
        .ok_or_else(|| CliError::config("could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}

/// Store `key` in the config file, keeping any other settings already there.
pub(crate) fn run_config_set_key(key: &str) -> Result<(), CliError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::config("API key must not be empty"));
    }

    // File values only, so env overrides are not persisted.
    let path = settings::config_path();
    let mut config = ClientConfig::load_with(path.as_deref(), |_| None)?;
    config.api_key = key.to_string();
    let written = settings::save_to_file(&config)?;

    log::info!(
        "{} API key saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        written.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
