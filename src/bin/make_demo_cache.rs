use anyhow::Result;

use breakout_sniper::data::demo::{DEMO_UNIVERSE, generate_bars};
use breakout_sniper::data::{MarketDataStorage, SqliteStorage};

const DB_PATH: &str = "market_data.sqlite";
const UNIVERSE_PATH: &str = "universe.txt";

// 300 daily bars per symbol: enough history for the 150-SMA coarse filter
// with room to spare for the widest interesting windows.
const DEMO_BAR_COUNT: usize = 300;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("🚀 Building demo market data at {}", DB_PATH);

    let storage = SqliteStorage::new(DB_PATH).await?;
    storage.initialize().await?;

    for spec in DEMO_UNIVERSE {
        let bars = generate_bars(spec.shape, DEMO_BAR_COUNT);
        let written = storage.insert_bars(spec.symbol, &bars).await?;
        storage.upsert_market_cap(spec.symbol, spec.market_cap).await?;

        log::info!(
            "   {} | {:?} | {} bars | cap ${:.1}B",
            spec.symbol,
            spec.shape,
            written,
            spec.market_cap / 1e9,
        );
    }

    // Matching universe file so the scanner runs with no further setup.
    let symbols: Vec<&str> = DEMO_UNIVERSE.iter().map(|spec| spec.symbol).collect();
    std::fs::write(UNIVERSE_PATH, symbols.join("\n") + "\n")?;

    log::info!("✅ Demo cache ready. Try: breakout-sniper --universe {}", UNIVERSE_PATH);
    Ok(())
}
