use {
    crate::domain::DailyBar,
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    chrono::NaiveDate,
    sqlx::{
        ConnectOptions, Pool, QueryBuilder, Row, Sqlite,
        sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    },
    std::{str::FromStr, time::Duration},
};

/// Local store for daily bars and market caps. The scanner treats retrieval
/// from the outside world as someone else's job; this store is the seam.
/// Must be safe for concurrent calls from multiple workers.
#[async_trait]
pub trait MarketDataStorage: Send + Sync {
    async fn initialize(&self) -> Result<()>;
    async fn insert_bars(&self, symbol: &str, bars: &[DailyBar]) -> Result<u64>;
    async fn load_bars(&self, symbol: &str) -> Result<Vec<DailyBar>>;
    async fn upsert_market_cap(&self, symbol: &str, market_cap: f64) -> Result<()>;
    async fn load_market_cap(&self, symbol: &str) -> Result<Option<f64>>;
}

pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(60))
            .synchronous(SqliteSynchronous::Normal)
            .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MarketDataStorage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_bars (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                PRIMARY KEY (symbol, date)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS market_caps (
                symbol TEXT PRIMARY KEY,
                market_cap REAL NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Batches bars in chunks of 4000 to stay within SQLite's 32k parameter limit.
    async fn insert_bars(&self, symbol: &str, bars: &[DailyBar]) -> Result<u64> {
        if bars.is_empty() {
            return Ok(0);
        }

        for chunk in bars.chunks(4000) {
            let mut query_builder = QueryBuilder::new(
                "INSERT OR REPLACE INTO daily_bars (symbol, date, open, high, low, close, volume) ",
            );

            query_builder.push_values(chunk, |mut b, bar| {
                b.push_bind(symbol)
                    .push_bind(bar.date.to_string())
                    .push_bind(bar.open)
                    .push_bind(bar.high)
                    .push_bind(bar.low)
                    .push_bind(bar.close)
                    .push_bind(bar.volume);
            });

            query_builder.build().execute(&self.pool).await?;
        }

        Ok(bars.len() as u64)
    }

    async fn load_bars(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let rows = sqlx::query(
            r#"
            SELECT date, open, high, low, close, volume
            FROM daily_bars
            WHERE symbol = ?
            ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await?;

        let mut bars = Vec::with_capacity(rows.len());
        for row in &rows {
            let date_str: String = row.get("date");
            let date = NaiveDate::from_str(&date_str)
                .map_err(|e| anyhow!("bad date '{}' for {}: {}", date_str, symbol, e))?;
            bars.push(DailyBar::new(
                date,
                row.get("open"),
                row.get("high"),
                row.get("low"),
                row.get("close"),
                row.get("volume"),
            ));
        }

        Ok(bars)
    }

    async fn upsert_market_cap(&self, symbol: &str, market_cap: f64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO market_caps (symbol, market_cap)
            VALUES (?, ?)
            "#,
        )
        .bind(symbol)
        .bind(market_cap)
        .execute(&self.pool)
        .await
        .with_context(|| format!("storing market cap for {}", symbol))?;

        Ok(())
    }

    async fn load_market_cap(&self, symbol: &str) -> Result<Option<f64>> {
        let row = sqlx::query(
            r#"
            SELECT market_cap FROM market_caps WHERE symbol = ?
            "#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("market_cap")))
    }
}
