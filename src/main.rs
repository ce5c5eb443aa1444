use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;

use breakout_sniper::Cli;
use breakout_sniper::config::ScanConfig;
use breakout_sniper::data::{MarketDataProvider, MarketDataStorage, SqliteStorage, StoreProvider, load_universe};
use breakout_sniper::engine::{TickerSkip, render_table, run_scan, save_json, skip_summary};
use breakout_sniper::models::SkipReason;
use breakout_sniper::TickerInput;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Single-ticker debugging wants the per-window detail by default.
    let default_level = if args.ticker.is_some() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Fail fast: an unspecified weight would silently corrupt every score.
    let mut config = ScanConfig::load(args.config.as_deref())?;
    if let Some(top_n) = args.top_n {
        config.ranking.top_n = top_n;
    }
    config.validate()?;

    let symbols = match &args.ticker {
        Some(ticker) => vec![ticker.trim().to_uppercase()],
        None => load_universe(&args.universe)?,
    };

    let db_path = args.db.to_str().context("db path is not valid UTF-8")?;
    let storage = SqliteStorage::new(db_path).await?;
    storage.initialize().await?;
    let provider = StoreProvider::new(Arc::new(storage));

    // Resolve every ticker's data up front; the scan core itself never
    // performs I/O. A failed fetch only removes that ticker.
    let resolved = join_all(symbols.iter().map(|s| resolve_ticker(&provider, s))).await;

    let mut inputs: Vec<TickerInput> = Vec::new();
    let mut fetch_failures: Vec<TickerSkip> = Vec::new();
    for outcome in resolved {
        match outcome {
            Ok(input) => inputs.push(input),
            Err((symbol, err)) => {
                log::warn!("{}: fetch failed: {:#}", symbol, err);
                fetch_failures.push(TickerSkip {
                    symbol,
                    reason: SkipReason::FetchFailed,
                });
            }
        }
    }

    let scan_date = chrono::Utc::now().date_naive();
    let report = run_scan(&inputs, fetch_failures, &config, scan_date)?;

    if report.candidates.is_empty() {
        log::info!("No breakout candidates found today.");
    } else {
        println!("{}", render_table(&report));
    }
    for (reason, count) in skip_summary(&report) {
        log::info!("skipped {:>4} | {}", count, reason);
    }

    let path = save_json(&report, &args.results_dir)?;
    log::info!("results saved to {}", path.display());

    Ok(())
}

async fn resolve_ticker(
    provider: &StoreProvider,
    symbol: &str,
) -> Result<TickerInput, (String, anyhow::Error)> {
    let series = provider
        .fetch_price_series(symbol)
        .await
        .map_err(|e| (symbol.to_string(), e))?;
    let market_cap = provider
        .fetch_market_cap(symbol)
        .await
        .map_err(|e| (symbol.to_string(), e))?;

    Ok(TickerInput {
        symbol: symbol.to_string(),
        series,
        market_cap,
    })
}
