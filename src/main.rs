use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_watcher::plugins::PluginManager;
use stock_watcher::scraper::ChromeDriver;
use stock_watcher::state::StateStore;
use stock_watcher::{NotifierCredentials, StockChecker, WatcherConfig};

/// Check a product page once and announce when it comes back in stock.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (must contain `product_url`)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// File holding the last observed status
    #[arg(short, long, default_value = "state.json")]
    state: PathBuf,

    /// Check and report without notifying or writing state
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, std::env::var("RUST_LOG").ok()))
        .init();

    dotenvy::dotenv().ok();

    let config = WatcherConfig::load(&cli.config)?;
    let plugins = PluginManager::from_credentials(
        &NotifierCredentials::from_env(),
        reqwest::Client::new(),
    );

    let checker = StockChecker::new(
        config.product_url.clone(),
        config.option_labels(),
        StateStore::new(cli.state),
        plugins,
    )
    .with_dry_run(cli.dry_run);

    let report = checker
        .check_once(|| ChromeDriver::launch(&config.browser))
        .await?;
    info!(
        "Check finished at {}: {} -> {}{}",
        report.checked_at.to_rfc3339(),
        report.previous,
        report.current,
        if report.restocked { " (back in stock)" } else { "" }
    );

    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise only this crate logs, at info
/// (debug with `--verbose`).
fn log_filter(verbose: bool, rust_log: Option<String>) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("stock_watcher={}", default_level)))
}
