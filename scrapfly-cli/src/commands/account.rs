use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use scrapfly_core::AccountData;

use super::{Connection, runtime, spinner};
use crate::error::CliError;

fn print_account(data: &AccountData) {
    let sub = &data.subscription;
    let scrape = &sub.usage.scrape;

    log::info!(
        "{}",
        "Scrapfly Account".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    log::info!("  Account:     {}", data.account.account_id);
    log::info!("  Project:     {}", data.project.name);
    log::info!(
        "  Plan:        {}",
        sub.plan_name.if_supports_color(Stdout, |t| t.cyan()),
    );
    if !sub.period.start.is_empty() {
        log::info!("  Period:      {} to {}", sub.period.start, sub.period.end);
    }
    log::info!("  Scrapes:     {} / {}", scrape.current, scrape.limit);

    let remaining = data.remaining_scrapes();
    if remaining > 0 {
        log::info!(
            "  Remaining:   {}",
            remaining.if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Remaining:   {}",
            remaining.if_supports_color(Stdout, |t| t.red()),
        );
    }
    log::info!(
        "  Concurrency: {} / {}",
        scrape.concurrent_usage, sub.max_concurrency,
    );

    if data.account.suspended {
        log::warn!(
            "  {} Account suspended: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            data.account.suspension_reason.as_deref().unwrap_or("no reason given"),
        );
    }
    if data.project.quota_reached {
        log::warn!(
            "  {} Project quota reached",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
}

/// Run the account command.
pub(crate) fn run_account(conn: &Connection) -> Result<(), CliError> {
    let client = conn.client()?;
    let pb = spinner("Fetching account...", conn.quiet);
    let rt = runtime()?;
    let result = rt.block_on(client.account());
    pb.finish_and_clear();
    print_account(&result?);
    Ok(())
}
