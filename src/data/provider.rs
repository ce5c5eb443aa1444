use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::data::storage::MarketDataStorage;
use crate::models::PriceSeries;

/// Abstract interface for resolving per-ticker market data.
/// Implementations own their caching and freshness; the scan core only ever
/// sees fully resolved inputs.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the full daily history for a ticker, ascending by date.
    async fn fetch_price_series(&self, symbol: &str) -> Result<PriceSeries>;

    /// Fetch the market capitalization. `Ok(None)` means the figure is
    /// unknown; the coarse filter treats that as a rejection, not an error.
    async fn fetch_market_cap(&self, symbol: &str) -> Result<Option<f64>>;
}

/// Provider backed by the local bar store. Network retrieval lives outside
/// this repository; whatever populated the store (downloader, demo cache
/// generator) already dealt with freshness.
pub struct StoreProvider {
    storage: Arc<dyn MarketDataStorage>,
}

impl StoreProvider {
    pub fn new(storage: Arc<dyn MarketDataStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MarketDataProvider for StoreProvider {
    async fn fetch_price_series(&self, symbol: &str) -> Result<PriceSeries> {
        let bars = self.storage.load_bars(symbol).await?;
        if bars.is_empty() {
            return Err(anyhow!("no bars stored for {}", symbol));
        }
        PriceSeries::from_bars(symbol, &bars)
    }

    async fn fetch_market_cap(&self, symbol: &str) -> Result<Option<f64>> {
        self.storage.load_market_cap(symbol).await
    }
}
