use {
    crate::{domain::DailyBar, utils},
    anyhow::{Result, anyhow},
    chrono::NaiveDate,
    itertools::Itertools,
    serde::{Deserialize, Serialize},
    statrs::statistics::Statistics,
};

/// Daily OHLCV history for one ticker, ascending by date.
/// Columnar layout: every per-bar attribute is its own vector, so window
/// analysis slices plain `&[f64]` without building row objects.
/// Immutable once constructed; the detection pipeline only reads it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl PriceSeries {
    pub fn from_bars(symbol: impl Into<String>, bars: &[DailyBar]) -> Result<Self> {
        let symbol = symbol.into();

        if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(anyhow!(
                "bars for {} are not strictly ascending around {}",
                symbol,
                pair[0].date
            ));
        }

        let len = bars.len();
        let mut dates = Vec::with_capacity(len);
        let mut opens = Vec::with_capacity(len);
        let mut highs = Vec::with_capacity(len);
        let mut lows = Vec::with_capacity(len);
        let mut closes = Vec::with_capacity(len);
        let mut volumes = Vec::with_capacity(len);

        for bar in bars {
            dates.push(bar.date);
            opens.push(bar.open);
            highs.push(bar.high);
            lows.push(bar.low);
            closes.push(bar.close);
            volumes.push(bar.volume);
        }

        Ok(Self {
            symbol,
            dates,
            opens,
            highs,
            lows,
            closes,
            volumes,
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Most recent SMA value over `period` closes.
    pub(crate) fn sma_last(&self, period: usize) -> Option<f64> {
        utils::rolling_mean_tail(&self.closes, period)
    }

    /// The last `count` values of the SMA(`period`) series over closes.
    pub(crate) fn sma_tail(&self, period: usize, count: usize) -> Option<Vec<f64>> {
        utils::sma_tail(&self.closes, period, count)
    }

    /// Latest volume over its trailing `window`-bar mean.
    /// Returns 0 when the baseline is missing or zero.
    pub(crate) fn latest_relative_volume(&self, window: usize) -> f64 {
        let Some(&current) = self.volumes.last() else {
            return 0.0;
        };
        match utils::rolling_mean_tail(&self.volumes, window) {
            Some(avg) if avg > 0.0 => current / avg,
            _ => 0.0,
        }
    }

    /// Close-to-close fractional returns. Non-finite values (zero closes in
    /// junk data) are dropped rather than poisoning the stdev.
    pub(crate) fn daily_returns(&self) -> Vec<f64> {
        self.closes
            .iter()
            .tuple_windows()
            .map(|(prev, next)| next / prev - 1.0)
            .filter(|r| r.is_finite())
            .collect()
    }

    /// Annualized volatility: sample stdev of daily returns times √trading-days.
    pub(crate) fn annualized_volatility(&self, annual_trading_days: f64) -> f64 {
        let returns = self.daily_returns();
        if returns.len() < 2 {
            return 0.0;
        }
        returns.std_dev() * annual_trading_days.sqrt()
    }

    /// Price bounds of the trailing `window` bars (low floor, high ceiling).
    /// Used for chart-overlay framing in the persisted output.
    pub(crate) fn window_bounds(&self, window: usize) -> Option<(f64, f64)> {
        if window == 0 || self.len() < window {
            return None;
        }
        let lows = &self.lows[self.len() - window..];
        let highs = &self.highs[self.len() - window..];
        Some((utils::get_min(lows), utils::get_max(highs)))
    }

    /// Trailing `window` bars of each analysis column.
    pub(crate) fn tail_columns(&self, window: usize) -> Option<(&[f64], &[f64], &[f64])> {
        if window == 0 || self.len() < window {
            return None;
        }
        let start = self.len() - window;
        Some((
            &self.highs[start..],
            &self.lows[start..],
            &self.closes[start..],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let bars: Vec<DailyBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                DailyBar::new(
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i as u64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    1_000_000.0,
                )
            })
            .collect();
        PriceSeries::from_bars("TEST", &bars).unwrap()
    }

    #[test]
    fn from_bars_rejects_unsorted_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let bars = vec![
            DailyBar::new(d, 1.0, 2.0, 0.5, 1.5, 10.0),
            DailyBar::new(d, 1.5, 2.5, 1.0, 2.0, 10.0),
        ];
        assert!(PriceSeries::from_bars("DUP", &bars).is_err());
    }

    #[test]
    fn relative_volume_against_trailing_mean() {
        let mut series = series_from_closes(&[10.0; 25]);
        // 19 quiet bars then a 2x spike: avg over 20 = (19*100 + 200)/20 = 105
        series.volumes = vec![100.0; 25];
        *series.volumes.last_mut().unwrap() = 200.0;
        let rel = series.latest_relative_volume(20);
        assert!((rel - 200.0 / 105.0).abs() < 1e-12);
    }

    #[test]
    fn relative_volume_zero_baseline() {
        let mut series = series_from_closes(&[10.0; 25]);
        series.volumes = vec![0.0; 25];
        assert_eq!(series.latest_relative_volume(20), 0.0);
    }

    #[test]
    fn daily_returns_and_volatility() {
        let series = series_from_closes(&[100.0, 110.0, 99.0]);
        let returns = series.daily_returns();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] - (-0.10)).abs() < 1e-12);

        // Constant series has zero volatility
        let flat = series_from_closes(&[50.0; 30]);
        assert_eq!(flat.annualized_volatility(252.0), 0.0);
    }

    #[test]
    fn window_bounds_cover_tail_only() {
        let series = series_from_closes(&[10.0, 20.0, 30.0, 40.0]);
        let (low, high) = series.window_bounds(2).unwrap();
        assert_eq!(low, 29.0);
        assert_eq!(high, 41.0);
        assert!(series.window_bounds(5).is_none());
    }
}
