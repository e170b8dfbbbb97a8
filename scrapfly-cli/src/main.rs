//! scrapfly CLI
//!
//! Command-line interface for the Scrapfly scraping, screenshot and
//! extraction APIs.

mod commands;
mod error;

use std::io::Write;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use commands::extract::ExtractArgs;
use commands::scrape::ScrapeArgs;
use commands::screenshot::ScreenshotArgs;
use commands::{Connection, account, config, extract, scrape, screenshot};

#[derive(Parser)]
#[command(name = "scrapfly")]
#[command(about = "Scrape, screenshot and extract web pages with the Scrapfly API", long_about = None)]
struct Cli {
    /// Show debug output (-vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API key (overrides SCRAPFLY_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// API host (overrides SCRAPFLY_HOST and the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one or more URLs concurrently
    Scrape(ScrapeArgs),

    /// Capture a screenshot of a page
    Screenshot(ScreenshotArgs),

    /// Extract structured data from a local document
    Extract(ExtractArgs),

    /// Show plan, usage and remaining quota
    Account,

    /// Manage the API key and config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,

    /// Store an API key in the config file
    SetKey {
        /// Scrapfly API key
        key: String,
    },
}

fn init_logger(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        // Prefix match: covers scrapfly_client and scrapfly_core too.
        .filter_module("scrapfly", level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let conn = Connection {
        api_key: cli.api_key,
        host: cli.host,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(&conn, args),
        Commands::Screenshot(args) => screenshot::run_screenshot(&conn, args),
        Commands::Extract(args) => extract::run_extract(&conn, args),
        Commands::Account => account::run_account(&conn),
        Commands::Config { action } => match action {
            ConfigAction::Show => config::run_config_show(),
            ConfigAction::Path => config::run_config_path(),
            ConfigAction::SetKey { key } => config::run_config_set_key(&key),
        },
    };

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}
