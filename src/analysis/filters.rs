//! Coarse pre-screen.
//!
//! Cheap O(n) checks that run before any window analysis. The multi-window
//! detector costs O(windows · n log n) per ticker, so everything that can
//! reject early must reject here. Pure predicate, no side effects.

use crate::analysis::trendline;
use crate::config::FilterConfig;
use crate::models::{PriceSeries, SkipReason};

/// Apply the coarse filters in cost order. `Ok(())` means the ticker moves on
/// to window analysis; `Err` carries the (expected, non-fatal) skip reason.
pub(crate) fn coarse_check(
    series: &PriceSeries,
    market_cap: Option<f64>,
    cfg: &FilterConfig,
) -> Result<(), SkipReason> {
    let cap = market_cap.ok_or(SkipReason::UnknownMarketCap)?;
    if cap < cfg.min_market_cap {
        return Err(SkipReason::BelowMarketCapFloor);
    }

    if series.len() < cfg.min_history_bars {
        return Err(SkipReason::InsufficientHistory);
    }

    let last_close = series.last_close().ok_or(SkipReason::InsufficientHistory)?;
    let sma = series
        .sma_last(cfg.sma_period)
        .ok_or(SkipReason::InsufficientHistory)?;
    if last_close <= sma {
        return Err(SkipReason::BelowLongTrend);
    }

    if sma_slope(series, cfg).is_none_or(|slope| slope < cfg.min_sma_slope) {
        return Err(SkipReason::WeakTrendSlope);
    }

    Ok(())
}

/// Slope of the last `sma_slope_window` SMA values, normalized by their first
/// value so the slope reads as fraction-per-bar, fitted against index 0..n.
fn sma_slope(series: &PriceSeries, cfg: &FilterConfig) -> Option<f64> {
    let tail = series.sma_tail(cfg.sma_period, cfg.sma_slope_window)?;
    let first = *tail.first()?;
    if first <= 0.0 {
        return None;
    }

    let xs: Vec<f64> = (0..tail.len()).map(|i| i as f64).collect();
    let ys: Vec<f64> = tail.iter().map(|v| v / first).collect();
    Some(trendline::fit_xy(&xs, &ys, None).slope)
}
